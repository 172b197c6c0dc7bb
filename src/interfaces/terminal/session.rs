use super::form::{HostedPanel, PaymentForm};
use super::views::{MethodCard, PlanCard, Selectable, SuccessView, SummaryCard};
use crate::application::checkout::{CheckoutController, PaymentDetails};
use crate::domain::card::CardField;
use crate::domain::catalog::MethodKind;
use crate::domain::ports::NotificationLevel;
use crate::domain::wizard::Step;
use crate::error::{CheckoutError, Result};
use crate::infrastructure::notifier::InMemoryNotifier;
use log::debug;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  <number> | <id>        choose a plan or payment method
  back                   go to the previous step
  name|number|month|year|cvv <value>
                         fill in a card field
  pay                    submit the payment
  dashboard              start over after a successful payment
  help                   show this help
  quit                   leave the checkout";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(String),
    Back,
    Field(CardField, String),
    Pay,
    Reset,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let field = match head.to_ascii_lowercase().as_str() {
        "name" => Some(CardField::CardholderName),
        "number" => Some(CardField::CardNumber),
        "month" => Some(CardField::ExpiryMonth),
        "year" => Some(CardField::ExpiryYear),
        "cvv" => Some(CardField::Cvv),
        _ => None,
    };
    if let Some(field) = field {
        return Some(Command::Field(field, rest.to_string()));
    }

    Some(match line.to_ascii_lowercase().as_str() {
        "back" => Command::Back,
        "pay" | "submit" => Command::Pay,
        "dashboard" | "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Select(line.to_string()),
    })
}

/// A line-driven checkout session.
///
/// Renders the current step to `output`, reads one command per input line and
/// turns it into a controller call. Notifications published by the controller
/// are drained from `inbox` and printed after every command.
pub struct Session<'a, W: Write> {
    controller: &'a CheckoutController,
    inbox: InMemoryNotifier,
    form: PaymentForm,
    output: W,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(controller: &'a CheckoutController, inbox: InMemoryNotifier, output: W) -> Self {
        Self {
            controller,
            inbox,
            form: PaymentForm::new(),
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        self.render().await?;

        let mut lines = input.lines();
        loop {
            let step = self.controller.state().await.step;
            write!(self.output, "{step}> ")?;
            self.output.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.output)?;
                break;
            };
            let Some(command) = parse_command(&line) else {
                continue;
            };
            debug!("Command on step '{}': {:?}", step, command);
            if command == Command::Quit {
                break;
            }

            if let Err(err) = self.dispatch(command).await {
                self.report(&err)?;
            }
            self.print_notifications()?;

            if self.controller.state().await.step != step {
                self.render().await?;
            }
        }

        writeln!(self.output, "Goodbye.")?;
        Ok(())
    }

    async fn dispatch(&mut self, command: Command) -> Result<()> {
        let controller = self.controller;
        let state = controller.state().await;

        match command {
            Command::Select(choice) => match state.step {
                Step::Plans => {
                    let id = controller
                        .catalog()
                        .plans()
                        .iter()
                        .enumerate()
                        .map(|(i, plan)| PlanCard {
                            plan,
                            position: i + 1,
                            is_selected: state.plan.is(&plan.id),
                        })
                        .find(|card| card.position.to_string() == choice || card.id() == choice)
                        .map(|card| card.click(str::to_string))
                        .unwrap_or(choice);
                    controller.select_plan(&id).await
                }
                Step::PaymentMethod => {
                    let id = controller
                        .catalog()
                        .methods()
                        .iter()
                        .enumerate()
                        .map(|(i, method)| MethodCard {
                            method,
                            position: i + 1,
                            is_selected: state.method.is(&method.id),
                        })
                        .find(|card| card.position.to_string() == choice || card.id() == choice)
                        .map(|card| card.click(str::to_string))
                        .unwrap_or(choice);
                    controller.select_method(&id).await
                }
                step => {
                    writeln!(
                        self.output,
                        "Nothing to choose on the {step} step. Type 'help' for commands."
                    )?;
                    Ok(())
                }
            },
            Command::Back => {
                controller.back().await?;
                if state.step == Step::PaymentDetails {
                    self.form = PaymentForm::new();
                }
                Ok(())
            }
            Command::Field(field, value) => {
                let card_step = state.step == Step::PaymentDetails
                    && controller.selected_method().await.map(|m| m.kind) == Some(MethodKind::Card);
                if !card_step {
                    writeln!(self.output, "There is no card form on the {} step.", state.step)?;
                    return Ok(());
                }
                self.form.input(field, &value);
                write!(self.output, "{}", self.form)?;
                Ok(())
            }
            Command::Pay => self.pay().await,
            Command::Reset => {
                controller.reset().await?;
                self.form = PaymentForm::new();
                Ok(())
            }
            Command::Help => {
                writeln!(self.output, "{HELP}")?;
                Ok(())
            }
            Command::Quit => Ok(()),
        }
    }

    async fn pay(&mut self) -> Result<()> {
        let controller = self.controller;
        let state = controller.state().await;
        let method = controller.selected_method().await;

        let receipt = match method {
            Some(method) if state.step == Step::PaymentDetails && method.kind == MethodKind::Card => {
                let Some(submission) = self
                    .form
                    .submit(|data| controller.submit(PaymentDetails::Card(data)))
                else {
                    return Err(CheckoutError::PaymentInProgress);
                };
                self.form.set_loading(true);
                writeln!(self.output, "[ {} ]", self.form.submit_label())?;
                let result = submission.await;
                self.form.set_loading(false);
                result?
            }
            Some(method) if state.step == Step::PaymentDetails => {
                let panel = HostedPanel {
                    method,
                    loading: true,
                };
                writeln!(self.output, "[ {} ]", panel.button_label())?;
                controller.submit(PaymentDetails::Hosted).await?
            }
            _ => controller.submit(PaymentDetails::Hosted).await?,
        };

        self.form = PaymentForm::new();
        writeln!(self.output, "Reference: {}", receipt.reference)?;
        Ok(())
    }

    fn report(&mut self, err: &CheckoutError) -> Result<()> {
        match err {
            // Already surfaced through a notification.
            CheckoutError::ValidationError(_) | CheckoutError::PaymentFailed(_) => Ok(()),
            _ => {
                writeln!(self.output, "! {err}")?;
                Ok(())
            }
        }
    }

    fn print_notifications(&mut self) -> Result<()> {
        for notification in self.inbox.drain() {
            let marker = match notification.level {
                NotificationLevel::Success => "✔",
                NotificationLevel::Failure => "✖",
            };
            writeln!(
                self.output,
                "{marker} {} {}",
                notification.title, notification.description
            )?;
        }
        Ok(())
    }

    async fn render(&mut self) -> Result<()> {
        let controller = self.controller;
        let state = controller.state().await;
        let catalog = controller.catalog();
        writeln!(self.output)?;

        match state.step {
            Step::Plans => {
                writeln!(self.output, "== Choose Your Plan ==")?;
                writeln!(
                    self.output,
                    "Select the perfect plan for your needs. Upgrade or downgrade anytime.\n"
                )?;
                for (i, plan) in catalog.plans().iter().enumerate() {
                    let card = PlanCard {
                        plan,
                        position: i + 1,
                        is_selected: state.plan.is(&plan.id),
                    };
                    writeln!(self.output, "{card}")?;
                }
            }
            Step::PaymentMethod => {
                let plan_name = controller.selected_plan().await.map(|p| p.name.as_str());
                writeln!(self.output, "== Choose Payment Method ==")?;
                writeln!(
                    self.output,
                    "Select how you'd like to pay for your {} subscription\n",
                    plan_name.unwrap_or_default()
                )?;
                for (i, method) in catalog.methods().iter().enumerate() {
                    let card = MethodCard {
                        method,
                        position: i + 1,
                        is_selected: state.method.is(&method.id),
                    };
                    writeln!(self.output, "{card}")?;
                }
                writeln!(self.output, "Type 'back' to change your plan.")?;
            }
            Step::PaymentDetails => {
                let plan = controller.selected_plan().await;
                let method = controller.selected_method().await;
                writeln!(self.output, "== Complete Your Payment ==")?;
                writeln!(
                    self.output,
                    "You're subscribing to {} via {}\n",
                    plan.map(|p| p.name.as_str()).unwrap_or_default(),
                    method.map(|m| m.name.as_str()).unwrap_or_default()
                )?;
                match method {
                    Some(method) if method.kind == MethodKind::Card => {
                        writeln!(self.output, "{}", self.form)?;
                    }
                    Some(method) => {
                        let panel = HostedPanel {
                            method,
                            loading: state.processing,
                        };
                        writeln!(self.output, "{panel}")?;
                    }
                    None => {}
                }
                if let Some(summary) = controller.summary().await {
                    writeln!(self.output, "{}", SummaryCard { summary: &summary })?;
                }
                writeln!(self.output, "Type 'back' to change the payment method.")?;
            }
            Step::Success => {
                let plan_name = controller.selected_plan().await.map(|p| p.name.as_str());
                writeln!(self.output, "{}", SuccessView { plan_name })?;
            }
        }
        Ok(())
    }
}
