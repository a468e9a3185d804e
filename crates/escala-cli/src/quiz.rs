//! Terminal driver for the quiz wizard.
//!
//! Each screen prints its question, reads one line, and turns it into a
//! wizard [`Event`]. Rejected events are reported inline and the same screen
//! is shown again.

use std::io::Write;

use escala_core::{ConversionTier, PracticeArea, RevenueBand};
use escala_wizard::{
    Effect, Event, LoadingConfig, LoadingTask, STATUS_LINES, Screen, Step, Submission, Wizard,
    WizardError,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// How a terminal session ended.
#[derive(Debug)]
pub enum Outcome {
    /// Contact details passed validation.
    Submitted(Box<Submission>),
    /// The session was opened directly on the results screen.
    ShowResults,
    /// Input closed before the quiz finished.
    Abandoned,
}

/// Parsed line on a multiple-choice screen.
enum Choice {
    Back,
    Option(usize),
    Invalid,
}

pub struct Terminal<R, W> {
    input: R,
    out: W,
}

impl<R: AsyncBufRead + Unpin, W: Write> Terminal<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Run the wizard until submission, the results screen, or end of input.
    pub async fn run(
        &mut self,
        wizard: &mut Wizard,
        loading: LoadingConfig,
    ) -> anyhow::Result<Outcome> {
        loop {
            let step = match wizard.screen() {
                Screen::Unknown(index) => {
                    writeln!(self.out, "\nOps! Algo deu errado.\nTela atual: {index}")?;
                    if self.prompt("Pressione Enter para reiniciar o quiz").await?.is_none() {
                        return Ok(Outcome::Abandoned);
                    }
                    self.apply(wizard, Event::Reset)?;
                    continue;
                }
                Screen::Step(step) => step,
            };
            debug!(step = %step, "showing screen");

            let event = match step {
                Step::Welcome => {
                    writeln!(self.out, "\nTESTE DE ESCALA PARA ADVOGADOS")?;
                    writeln!(
                        self.out,
                        "Descubra o quanto de dinheiro seu escritório está deixando na mesa todos os meses."
                    )?;
                    match self.prompt("Pressione Enter para começar o diagnóstico").await? {
                        Some(_) => Event::Start,
                        None => return Ok(Outcome::Abandoned),
                    }
                }
                Step::PracticeArea => {
                    let labels: Vec<_> = PracticeArea::ALL.iter().map(|a| a.label()).collect();
                    match self.choose("Qual sua área de atuação?", &labels).await? {
                        Some(Choice::Option(i)) => Event::ChooseArea(PracticeArea::ALL[i]),
                        Some(Choice::Back) => Event::Back,
                        Some(Choice::Invalid) => continue,
                        None => return Ok(Outcome::Abandoned),
                    }
                }
                Step::AdSpend | Step::ContractValue => {
                    let question = if step == Step::AdSpend {
                        "Quanto você investe por mês em tráfego pago? (Ex: R$ 3.000)"
                    } else {
                        "Qual o ticket médio dos seus contratos? (Ex: R$ 4.500)"
                    };
                    let Some(line) = self.prompt(question).await? else {
                        return Ok(Outcome::Abandoned);
                    };
                    if is_back(&line) {
                        Event::Back
                    } else {
                        let edit = if step == Step::AdSpend {
                            Event::EditAdSpend(line)
                        } else {
                            Event::EditContractValue(line)
                        };
                        self.apply(wizard, edit)?;
                        let shown = if step == Step::AdSpend {
                            wizard.ad_spend_display()
                        } else {
                            wizard.contract_value_display()
                        };
                        if !shown.is_empty() {
                            writeln!(self.out, "  {shown}")?;
                        }
                        Event::Continue
                    }
                }
                Step::ConversionRate => {
                    writeln!(
                        self.out,
                        "\nA cada 10 contatos que você recebe, quantos viram contratos?"
                    )?;
                    let labels: Vec<_> = ConversionTier::ALL.iter().map(|t| t.label()).collect();
                    match self
                        .choose(
                            "Qual sua taxa média de conversão de leads em contratos?",
                            &labels,
                        )
                        .await?
                    {
                        Some(Choice::Option(i)) => Event::ChooseConversion(ConversionTier::ALL[i]),
                        Some(Choice::Back) => Event::Back,
                        Some(Choice::Invalid) => continue,
                        None => return Ok(Outcome::Abandoned),
                    }
                }
                Step::CurrentRevenue => {
                    writeln!(
                        self.out,
                        "\nConsidere a receita bruta mensal atual do seu escritório"
                    )?;
                    let labels: Vec<_> = RevenueBand::ALL.iter().map(|b| b.label()).collect();
                    match self
                        .choose("Qual o faturamento mensal do seu escritório?", &labels)
                        .await?
                    {
                        Some(Choice::Option(i)) => Event::ChooseRevenue(RevenueBand::ALL[i]),
                        Some(Choice::Back) => Event::Back,
                        Some(Choice::Invalid) => continue,
                        None => return Ok(Outcome::Abandoned),
                    }
                }
                Step::Loading => {
                    self.run_loading(loading).await?;
                    Event::LoadingFinished
                }
                Step::ContactInfo => {
                    if !self.collect_contact(wizard).await? {
                        return Ok(Outcome::Abandoned);
                    }
                    Event::Submit
                }
                Step::Results => return Ok(Outcome::ShowResults),
            };

            match self.apply(wizard, event)? {
                Effect::StartLoading | Effect::None => {}
                Effect::Submitted(submission) => {
                    info!("quiz completed");
                    return Ok(Outcome::Submitted(submission));
                }
            }
        }
    }

    /// Apply an event, reporting guard failures inline instead of aborting.
    fn apply(&mut self, wizard: &mut Wizard, event: Event) -> anyhow::Result<Effect> {
        match wizard.handle(event) {
            Ok(effect) => Ok(effect),
            Err(WizardError::ZeroAmount) => {
                writeln!(self.out, "  Informe um valor maior que zero.")?;
                Ok(Effect::None)
            }
            Err(WizardError::ContactInvalid) => {
                let errors = wizard.contact_errors();
                for err in errors.phone.iter().chain(errors.email.iter()) {
                    writeln!(self.out, "  {err}")?;
                }
                Ok(Effect::None)
            }
            Err(e @ WizardError::NotAccepted { .. }) => Err(e.into()),
        }
    }

    async fn run_loading(&mut self, config: LoadingConfig) -> anyhow::Result<()> {
        writeln!(
            self.out,
            "\nCom base nas suas respostas, estamos calculando o valor (estimado) que você está deixando na mesa todos os meses..."
        )?;
        for line in STATUS_LINES {
            writeln!(self.out, "  {line}")?;
        }
        let task = LoadingTask::start(config);
        let mut progress = task.progress();
        // The sender lives in the task, so this ends once the task finishes.
        while progress.changed().await.is_ok() {
            let percent = progress.borrow_and_update().percent();
            write!(self.out, "\r  {percent}%")?;
            self.out.flush()?;
        }
        writeln!(self.out)?;
        task.finished().await?;
        Ok(())
    }

    /// Collect name, email and phone, re-asking while the inline checks fail.
    ///
    /// Returns `false` if input ends first.
    async fn collect_contact(&mut self, wizard: &mut Wizard) -> anyhow::Result<bool> {
        writeln!(self.out, "\nPara receber o resultado, deixe aqui seus dados")?;
        writeln!(
            self.out,
            "🔒 Seus dados estão seguros e serão usados apenas para enviar o diagnóstico"
        )?;

        loop {
            let Some(name) = self.prompt("Seu nome completo").await? else {
                return Ok(false);
            };
            self.apply(wizard, Event::EditName(name.trim().to_string()))?;
            if !wizard.answers().full_name.is_empty() {
                break;
            }
        }

        loop {
            let Some(email) = self.prompt("seu@email.com").await? else {
                return Ok(false);
            };
            self.apply(wizard, Event::EditEmail(email.trim().to_string()))?;
            match &wizard.contact_errors().email {
                Some(err) => writeln!(self.out, "  {err}")?,
                None => break,
            }
        }

        loop {
            let Some(phone) = self.prompt("WhatsApp com DDD, ex: (11) 99999-9999").await? else {
                return Ok(false);
            };
            self.apply(wizard, Event::EditPhone(phone))?;
            writeln!(self.out, "  {}", wizard.answers().phone_number)?;
            match &wizard.contact_errors().phone {
                Some(err) => writeln!(self.out, "  {err}")?,
                None => break,
            }
        }

        Ok(true)
    }

    /// Print numbered options and parse the reply. `None` on end of input.
    async fn choose(&mut self, question: &str, options: &[&str]) -> anyhow::Result<Option<Choice>> {
        writeln!(self.out, "\n{question}")?;
        for (i, label) in options.iter().enumerate() {
            writeln!(self.out, "  {}. {label}", i + 1)?;
        }
        let Some(line) = self.prompt("Escolha uma opção (b para voltar)").await? else {
            return Ok(None);
        };
        if is_back(&line) {
            return Ok(Some(Choice::Back));
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Ok(Some(Choice::Option(n - 1))),
            _ => {
                writeln!(self.out, "  Opção inválida: {}", line.trim())?;
                Ok(Some(Choice::Invalid))
            }
        }
    }

    /// Print `label`, read one line without its terminator. `None` on end of input.
    async fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn is_back(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "b" | "voltar")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    fn fast() -> LoadingConfig {
        LoadingConfig {
            tick: Duration::from_millis(1),
            settle: Duration::from_millis(1),
            ..LoadingConfig::default()
        }
    }

    async fn drive(wizard: &mut Wizard, script: &str) -> (Outcome, String) {
        let mut out = Vec::new();
        let outcome = Terminal::new(script.as_bytes(), &mut out)
            .run(wizard, fast())
            .await
            .expect("terminal session failed");
        (outcome, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn scripted_session_submits() {
        let script = "\n1\n3000\nR$ 4.500\n2\n2\nAna Souza\nana@souza\nana@souza.adv.br\n119876\n11987654321\n";
        let mut wizard = Wizard::new();
        let (outcome, out) = drive(&mut wizard, script).await;

        let Outcome::Submitted(submission) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(submission.results.missed_revenue, 128_500);
        assert_eq!(submission.answers.full_name, "Ana Souza");
        assert_eq!(wizard.step(), Some(Step::Results));
        assert!(out.contains("R$\u{a0}3.000"));
        assert!(out.contains("Por favor, insira um email válido"));
        assert!(out.contains("Insira um número válido com DDD (11 dígitos)"));
        assert!(out.contains("100%"));
    }

    #[tokio::test]
    async fn waiting_for_input_leaves_runtime_free() {
        // Single-threaded runtime: the writer only runs if reading yields.
        let (reader, mut writer) = tokio::io::duplex(64);
        let typist = async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            writer.write_all(b"\n1\n").await.unwrap();
        };
        let mut wizard = Wizard::new();
        let mut out = Vec::new();
        let mut terminal = Terminal::new(tokio::io::BufReader::new(reader), &mut out);
        let (outcome, ()) = tokio::join!(terminal.run(&mut wizard, fast()), typist);
        assert!(matches!(outcome.unwrap(), Outcome::Abandoned));
        assert_eq!(wizard.step(), Some(Step::AdSpend));
    }

    #[tokio::test]
    async fn back_and_invalid_choices_stay_in_session() {
        // Enter, back to welcome, enter again, bad option, then stop.
        let script = "\nb\n\n9\n";
        let mut wizard = Wizard::new();
        let (outcome, out) = drive(&mut wizard, script).await;
        assert!(matches!(outcome, Outcome::Abandoned));
        assert_eq!(wizard.step(), Some(Step::PracticeArea));
        assert!(out.contains("Opção inválida: 9"));
    }

    #[tokio::test]
    async fn zero_amount_is_reported_and_reasked() {
        let script = "\n1\nR$\n0\n5000\n";
        let mut wizard = Wizard::new();
        let (_, out) = drive(&mut wizard, script).await;
        assert_eq!(out.matches("Informe um valor maior que zero.").count(), 2);
        assert_eq!(wizard.step(), Some(Step::ContractValue));
        assert_eq!(wizard.answers().monthly_ad_spend, 5000);
    }

    #[tokio::test]
    async fn unknown_step_offers_reset() {
        let mut wizard = Wizard::starting_at(11);
        let (outcome, out) = drive(&mut wizard, "\n").await;
        assert!(matches!(outcome, Outcome::Abandoned));
        assert!(out.contains("Tela atual: 11"));
        assert_eq!(wizard.step(), Some(Step::Welcome));
    }

    #[tokio::test]
    async fn results_route_skips_questions() {
        let mut wizard = Wizard::starting_at(8);
        let (outcome, out) = drive(&mut wizard, "").await;
        assert!(matches!(outcome, Outcome::ShowResults));
        assert!(out.is_empty());
    }
}
