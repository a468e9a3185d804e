//! Propagate the page's query string onto every link in a document.
//!
//! Visitors arriving with `?utm_source=...` keep their attribution when they
//! follow any link on the page, including links inserted after load.

use tracing::{debug, info};
use url::Url;
use url::form_urlencoded;

use crate::document::{Document, InsertionObserver, NodeId, Tree};

/// Appends a fixed query string to link targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRewriter {
    query: String,
}

impl LinkRewriter {
    /// Build a rewriter carrying `page`'s query, re-serialised as form-urlencoded pairs.
    ///
    /// Returns `None` when the page has no query or the query has no pairs.
    pub fn for_page(page: &Url) -> Option<Self> {
        page.query()?;
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(page.query_pairs())
            .finish();
        if query.is_empty() {
            return None;
        }
        Some(Self { query })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Append the query to `href` with `?` or `&` as appropriate.
    pub fn rewrite_href(&self, href: &str) -> String {
        let sep = if href.contains('?') { '&' } else { '?' };
        format!("{href}{sep}{}", self.query)
    }

    /// Rewrite every `<a>` with a non-empty `href` in `root`'s subtree, `root` included.
    ///
    /// Returns the number of links changed.
    pub fn rewrite_subtree(&self, tree: &mut Tree, root: NodeId) -> usize {
        let mut changed = 0;
        for link in tree.elements_by_tag(root, "a") {
            let Some(href) = tree.attr(link, "href").filter(|h| !h.is_empty()) else {
                continue;
            };
            let rewritten = self.rewrite_href(href);
            tree.set_attr(link, "href", rewritten);
            changed += 1;
        }
        changed
    }
}

impl InsertionObserver for LinkRewriter {
    fn subtree_inserted(&self, tree: &mut Tree, root: NodeId) {
        let changed = self.rewrite_subtree(tree, root);
        if changed > 0 {
            debug!(changed, "decorated inserted links");
        }
    }
}

/// Decorate all links in `doc` with `page`'s query and keep decorating links
/// added later.
///
/// Does nothing when `page` carries no query. Returns the number of links
/// rewritten immediately.
pub fn install(page: &Url, doc: &mut Document) -> usize {
    let Some(rewriter) = LinkRewriter::for_page(page) else {
        debug!(page = %page, "no query parameters on page; links left untouched");
        return 0;
    };
    let root = doc.root();
    let changed = rewriter.rewrite_subtree(doc.tree_mut(), root);
    info!(changed, query = %rewriter.query(), "decorated links with page query");
    doc.observe(Box::new(rewriter));
    changed
}
