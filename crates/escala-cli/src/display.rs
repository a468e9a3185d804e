//! Results page and estimate card.
//!
//! The results page is assembled as a [`Document`] so the attribution link
//! rewriter sees it exactly as it would see a rendered page, then flattened to
//! text for the terminal.

use std::fmt::Write;

use escala_attribution::{Document, DocumentError, NodeData, NodeId, Tree};
use escala_core::{DerivedResults, QuizAnswers, contact_link, first_name, format_currency};
use url::Url;

const INDENT: &str = "  ";

// ── Copy ──

const HEADLINE_SUFFIX: &str =
    "este é o valor em contratos que você está deixando na mesa todos os meses";

const TRUTH_HEADER: &str = "A Verdade Que Ninguém Te Conta";

const TRUTH: &[&str] = &[
    "Você já entendeu: não é sobre ser um bom advogado.",
    "E hoje… você ainda parece só mais um na multidão.",
    "Você estudou. Se formou. Fez pós, especializações, se dedicou à sua área... \
     Mas ainda depende do acaso ou de indicações para manter o escritório girando.",
    "Enquanto isso, tem colegas com menos experiência, menos formação... \
     …faturando 3x mais que você.",
];

const ALERT: &str = "VOCÊ ESTÁ DEIXANDO DINHEIRO NA MESA TODOS OS MESES.";

const MISSING: &[&str] = &[
    "Falta um processo previsível para atrair os clientes certos",
    "Falta uma oferta que mostre o valor do seu serviço",
    "Falta um posicionamento estratégico para te fazer visto como referência absoluta",
];

const CLOSING: &[&str] = &[
    "O problema é a ausência de um modelo de crescimento previsível e lucrativo.",
    "📝 E é exatamente isso que nós podemos te mostrar.",
    "✅ Já ajudamos dezenas de advogados a crescer.",
    "E a boa notícia é: você pode acessar o mesmo caminho agora.",
];

const CTA_HEADER: &str = "💬 Quer aplicar isso no seu escritório?";
const CTA_TEXT: &str = "👇 Clique abaixo para falar com um especialista e agendar um horário:";
const CTA_LINK: &str = "Falar com um Especialista no WhatsApp";
const CTA_NOTE: &str = "🔒 Conversa 100% confidencial e sem compromisso";

// ── Public API ──

/// Build the results page for `page`.
///
/// Link decoration is installed on the empty document first, so every link
/// added while the page is built passes through the insertion observer.
pub fn results_page(
    page: &Url,
    answers: &QuizAnswers,
    results: &DerivedResults,
) -> Result<Document, DocumentError> {
    let mut doc = Document::new();
    escala_attribution::install(page, &mut doc);
    let body = doc.body();

    let hero = doc.append_element(body, "section", &[("id", "resultado")]);
    let greeting = format!("{}, {HEADLINE_SUFFIX}", first_name(&answers.full_name));
    text_element(&mut doc, hero, "h1", &greeting);
    text_element(&mut doc, hero, "strong", &format_currency(results.missed_revenue));
    text_element(&mut doc, hero, "p", "por mês em oportunidades perdidas");

    let metrics = doc.append_element(hero, "ul", &[("class", "metricas")]);
    let lines = [
        format!("Leads possíveis por mês: {}", results.estimated_leads),
        format!("Contratos possíveis por mês: {}", results.estimated_new_contracts),
        format!(
            "Faturamento potencial: {}",
            format_currency(results.potential_monthly_revenue)
        ),
    ];
    for line in &lines {
        text_element(&mut doc, metrics, "li", line);
    }

    let truth = doc.append_element(body, "section", &[]);
    text_element(&mut doc, truth, "h2", TRUTH_HEADER);
    for para in TRUTH {
        text_element(&mut doc, truth, "p", para);
    }
    text_element(&mut doc, truth, "h2", ALERT);
    let missing = doc.append_element(truth, "ul", &[]);
    for item in MISSING {
        text_element(&mut doc, missing, "li", item);
    }
    for para in CLOSING {
        text_element(&mut doc, truth, "p", para);
    }

    // Built detached and attached in one go, like a late-rendered widget.
    let cta = doc.create_element("section", &[("id", "cta")]);
    text_element(&mut doc, cta, "h3", CTA_HEADER);
    text_element(&mut doc, cta, "p", CTA_TEXT);
    let link = contact_link();
    let anchor = doc.append_element(
        cta,
        "a",
        &[
            ("href", link.as_str()),
            ("target", "_blank"),
            ("rel", "noopener noreferrer"),
        ],
    );
    doc.append_text(anchor, CTA_LINK);
    text_element(&mut doc, cta, "p", CTA_NOTE);
    doc.append_child(body, cta)?;

    Ok(doc)
}

/// Flatten a document to terminal text: headings underlined, list items
/// bulleted, links as `text <href>`.
pub fn render_text(doc: &Document) -> String {
    let mut out = String::new();
    render_node(doc.tree(), doc.body(), &mut out);
    out
}

/// Compact card for `escala estimate`.
pub fn estimate_card(results: &DerivedResults) -> String {
    let mut out = String::new();
    let rows = [
        ("cost_per_lead", format!("{:.2}", results.cost_per_lead)),
        ("estimated_leads", results.estimated_leads.to_string()),
        (
            "estimated_new_contracts",
            results.estimated_new_contracts.to_string(),
        ),
        (
            "potential_monthly_revenue",
            format_currency(results.potential_monthly_revenue),
        ),
        ("missed_revenue", format_currency(results.missed_revenue)),
    ];
    let _ = writeln!(out, "Estimate");
    for (name, value) in rows {
        let _ = writeln!(out, "  {:<26} {}", name, value);
    }
    out
}

// ── Rendering ──

fn text_element(doc: &mut Document, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let id = doc.append_element(parent, tag, &[]);
    doc.append_text(id, text);
    id
}

fn render_node(tree: &Tree, id: NodeId, out: &mut String) {
    let NodeData::Element { tag, .. } = tree.data(id) else {
        return;
    };
    match tag.as_str() {
        "h1" | "h2" | "h3" => {
            let text = tree.text(id);
            let rule = if tag == "h1" { '=' } else { '-' };
            let _ = writeln!(out, "\n{text}");
            let _ = writeln!(out, "{}", rule.to_string().repeat(text.chars().count()));
        }
        "p" | "strong" => {
            let _ = writeln!(out, "{}", tree.text(id));
        }
        "li" => {
            let _ = writeln!(out, "{INDENT}- {}", tree.text(id));
        }
        "a" => {
            let href = tree.attr(id, "href").unwrap_or_default();
            let _ = writeln!(out, "{INDENT}{} <{href}>", tree.text(id));
        }
        _ => {
            for &child in tree.children(id) {
                render_node(tree, child, out);
            }
        }
    }
}
