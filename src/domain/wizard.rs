//! Wizard navigation as a pure state machine.
//!
//! Each call to [`transition`] takes the current step and an immutable
//! context and returns the next step with a new context. An event that is not
//! valid for the current step is an error and leaves the caller's context
//! untouched.

use crate::domain::error::StockproError;
use crate::domain::input_validation::{validate_capital, validate_trade_input};
use crate::domain::journal::{Journal, JournalEntry, StockFilter};
use crate::domain::settings::Settings;
use crate::domain::sizing::{PositionPlan, compute_position};
use crate::domain::trade::TradeInput;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Welcome,
    Capital,
    TradeSetup,
    Analyzing,
    Results,
    Journal,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Welcome => "welcome",
            Step::Capital => "capital",
            Step::TradeSetup => "trade setup",
            Step::Analyzing => "analyzing",
            Step::Results => "results",
            Step::Journal => "journal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,
    Back,
    SetCapital(f64),
    Next,
    SubmitTrade(TradeInput),
    Run,
    Finish,
    Save,
    Fix,
    Restart,
    Filter(StockFilter),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Start => "start",
            Event::Back => "go back",
            Event::SetCapital(_) => "set capital",
            Event::Next => "continue",
            Event::SubmitTrade(_) => "submit a trade",
            Event::Run => "run the analysis",
            Event::Finish => "finish the analysis",
            Event::Save => "save",
            Event::Fix => "fix input",
            Event::Restart => "restart",
            Event::Filter(_) => "filter",
        }
    }
}

/// Result of sizing the current trade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingOutcome {
    Plan(PositionPlan),
    Rejected { entry: f64, stop_loss: f64 },
    /// The share count cannot be represented; capital or prices are extreme.
    OutOfRange,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardContext {
    pub capital: Option<f64>,
    pub trade: Option<TradeInput>,
    pub outcome: Option<SizingOutcome>,
    pub journal: Journal,
    pub filter: StockFilter,
}

impl WizardContext {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn plan(&self) -> Option<&PositionPlan> {
        match &self.outcome {
            Some(SizingOutcome::Plan(plan)) => Some(plan),
            _ => None,
        }
    }

    pub fn visible_entries(&self) -> Vec<&JournalEntry> {
        self.filter.apply(&self.journal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub step: Step,
    pub context: WizardContext,
}

fn moved(step: Step, context: WizardContext) -> Result<Transition, StockproError> {
    Ok(Transition { step, context })
}

pub fn transition(
    step: Step,
    ctx: &WizardContext,
    event: Event,
    settings: &Settings,
) -> Result<Transition, StockproError> {
    let mut next = ctx.clone();
    match (step, event) {
        (Step::Welcome, Event::Start) => moved(Step::Capital, next),

        (Step::Capital, Event::SetCapital(capital)) => {
            validate_capital(capital, settings.strict_validation)?;
            next.capital = Some(capital);
            moved(Step::Capital, next)
        }
        (Step::Capital, Event::Next) => {
            if next.capital.is_none() {
                return Err(StockproError::invalid_input("capital", "enter a capital amount first"));
            }
            moved(Step::TradeSetup, next)
        }
        (Step::Capital, Event::Back) => moved(Step::Welcome, next),

        (Step::TradeSetup, Event::SubmitTrade(trade)) => {
            validate_trade_input(
                next.capital.unwrap_or_default(),
                &trade,
                settings.strict_validation,
            )?;
            next.trade = Some(trade);
            next.outcome = None;
            moved(Step::TradeSetup, next)
        }
        (Step::TradeSetup, Event::Run) => {
            if next.trade.is_none() {
                return Err(StockproError::invalid_input("trade", "enter the trade details first"));
            }
            moved(Step::Analyzing, next)
        }
        (Step::TradeSetup, Event::Back) => moved(Step::Capital, next),

        (Step::Analyzing, Event::Finish) => {
            let (capital, trade) = match (next.capital, next.trade.as_ref()) {
                (Some(c), Some(t)) => (c, t),
                _ => {
                    return Err(StockproError::InvalidTransition {
                        step: step.to_string(),
                        event: Event::Finish.name().to_string(),
                    });
                }
            };
            let outcome = match compute_position(
                capital,
                trade.entry_price,
                trade.stop_loss,
                &settings.sizing,
            ) {
                Ok(plan) => SizingOutcome::Plan(plan),
                Err(StockproError::InvalidStopLoss { entry, stop_loss }) => {
                    SizingOutcome::Rejected { entry, stop_loss }
                }
                Err(StockproError::InvalidInput { .. }) => SizingOutcome::OutOfRange,
                Err(e) => return Err(e),
            };
            next.outcome = Some(outcome);
            moved(Step::Results, next)
        }

        (Step::Results, Event::Save) => {
            let entry = match (&next.outcome, &next.trade) {
                (Some(SizingOutcome::Plan(plan)), Some(trade)) => JournalEntry::from_plan(trade, plan),
                (Some(SizingOutcome::Rejected { entry, stop_loss }), _) => {
                    return Err(StockproError::InvalidStopLoss {
                        entry: *entry,
                        stop_loss: *stop_loss,
                    });
                }
                (Some(SizingOutcome::OutOfRange), _) => {
                    return Err(StockproError::invalid_input(
                        "shares",
                        "position size is out of range",
                    ));
                }
                _ => {
                    return Err(StockproError::InvalidTransition {
                        step: step.to_string(),
                        event: Event::Save.name().to_string(),
                    });
                }
            };
            next.journal.append(entry);
            moved(Step::Journal, next)
        }
        (Step::Results, Event::Fix)
            if matches!(
                next.outcome,
                Some(SizingOutcome::Rejected { .. } | SizingOutcome::OutOfRange)
            ) =>
        {
            next.outcome = None;
            moved(Step::TradeSetup, next)
        }

        (Step::Journal, Event::Filter(filter)) => {
            next.filter = filter;
            moved(Step::Journal, next)
        }
        (Step::Journal, Event::Restart) => {
            next.trade = None;
            next.outcome = None;
            next.filter = StockFilter::All;
            moved(Step::Capital, next)
        }

        (step, event) => Err(StockproError::InvalidTransition {
            step: step.to_string(),
            event: event.name().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::TrendChecks;
    use chrono::NaiveDate;

    fn trade(entry: f64, stop: f64) -> TradeInput {
        TradeInput::new(
            "reliance",
            entry,
            stop,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            TrendChecks::all(),
        )
    }

    fn step(s: Step, ctx: &WizardContext, e: Event) -> Transition {
        transition(s, ctx, e, &Settings::default()).unwrap()
    }

    fn drive_to_results(entry: f64, stop: f64) -> Transition {
        let ctx = WizardContext::default();
        let t = step(Step::Welcome, &ctx, Event::Start);
        let t = step(t.step, &t.context, Event::SetCapital(100_000.0));
        let t = step(t.step, &t.context, Event::Next);
        let t = step(t.step, &t.context, Event::SubmitTrade(trade(entry, stop)));
        let t = step(t.step, &t.context, Event::Run);
        assert_eq!(t.step, Step::Analyzing);
        step(t.step, &t.context, Event::Finish)
    }

    #[test]
    fn happy_path_saves_one_entry() {
        let t = drive_to_results(2500.0, 2450.0);
        assert_eq!(t.step, Step::Results);
        assert_eq!(t.context.plan().unwrap().shares, 20);

        let t = step(t.step, &t.context, Event::Save);
        assert_eq!(t.step, Step::Journal);
        assert_eq!(t.context.journal.len(), 1);
        assert_eq!(t.context.journal.entries()[0].stock, "RELIANCE");
    }

    #[test]
    fn invalid_stop_blocks_save_and_offers_fix() {
        let t = drive_to_results(2500.0, 2600.0);
        assert_eq!(t.step, Step::Results);
        assert!(matches!(t.context.outcome, Some(SizingOutcome::Rejected { .. })));

        let err = transition(t.step, &t.context, Event::Save, &Settings::default()).unwrap_err();
        assert!(matches!(err, StockproError::InvalidStopLoss { .. }));
        assert!(t.context.journal.is_empty());

        let fixed = step(t.step, &t.context, Event::Fix);
        assert_eq!(fixed.step, Step::TradeSetup);
        assert!(fixed.context.outcome.is_none());
    }

    #[test]
    fn oversized_capital_goes_to_fix_path() {
        let ctx = WizardContext::default();
        let t = step(Step::Welcome, &ctx, Event::Start);
        let t = step(t.step, &t.context, Event::SetCapital(1e25));
        let t = step(t.step, &t.context, Event::Next);
        let t = step(t.step, &t.context, Event::SubmitTrade(trade(100.0, 99.0)));
        let t = step(t.step, &t.context, Event::Run);
        let t = step(t.step, &t.context, Event::Finish);
        assert_eq!(t.step, Step::Results);
        assert_eq!(t.context.outcome, Some(SizingOutcome::OutOfRange));

        let err = transition(t.step, &t.context, Event::Save, &Settings::default()).unwrap_err();
        assert!(matches!(err, StockproError::InvalidInput { .. }));
        assert!(t.context.journal.is_empty());

        let fixed = step(t.step, &t.context, Event::Fix);
        assert_eq!(fixed.step, Step::TradeSetup);
    }

    #[test]
    fn fix_not_offered_for_valid_plan() {
        let t = drive_to_results(2500.0, 2450.0);
        let err = transition(t.step, &t.context, Event::Fix, &Settings::default()).unwrap_err();
        assert!(matches!(err, StockproError::InvalidTransition { .. }));
    }

    #[test]
    fn back_edges() {
        let ctx = WizardContext::default();
        assert_eq!(step(Step::Capital, &ctx, Event::Back).step, Step::Welcome);
        assert_eq!(step(Step::TradeSetup, &ctx, Event::Back).step, Step::Capital);
    }

    #[test]
    fn next_requires_capital() {
        let err = transition(Step::Capital, &WizardContext::default(), Event::Next, &Settings::default())
            .unwrap_err();
        assert!(matches!(err, StockproError::InvalidInput { .. }));
    }

    #[test]
    fn run_requires_trade() {
        let err = transition(Step::TradeSetup, &WizardContext::default(), Event::Run, &Settings::default())
            .unwrap_err();
        assert!(matches!(err, StockproError::InvalidInput { .. }));
    }

    #[test]
    fn unknown_event_is_rejected_without_change() {
        let ctx = WizardContext::default();
        let err = transition(Step::Welcome, &ctx, Event::Save, &Settings::default()).unwrap_err();
        assert_eq!(err.to_string(), "cannot save from the welcome step");
        assert_eq!(ctx, WizardContext::default());
    }

    #[test]
    fn restart_keeps_journal_and_capital() {
        let t = drive_to_results(2500.0, 2450.0);
        let t = step(t.step, &t.context, Event::Save);
        let t = step(t.step, &t.context, Event::Filter(StockFilter::Stock("TCS".into())));
        assert!(t.context.visible_entries().is_empty());

        let t = step(t.step, &t.context, Event::Restart);
        assert_eq!(t.step, Step::Capital);
        assert_eq!(t.context.journal.len(), 1);
        assert_eq!(t.context.capital, Some(100_000.0));
        assert!(t.context.trade.is_none());
        assert_eq!(t.context.filter, StockFilter::All);
    }

    #[test]
    fn second_save_appends_again() {
        let t = drive_to_results(2500.0, 2450.0);
        let t = step(t.step, &t.context, Event::Save);
        let t = step(t.step, &t.context, Event::Restart);
        let t = step(t.step, &t.context, Event::Next);
        let t = step(t.step, &t.context, Event::SubmitTrade(trade(100.0, 90.0)));
        let t = step(t.step, &t.context, Event::Run);
        let t = step(t.step, &t.context, Event::Finish);
        let t = step(t.step, &t.context, Event::Save);
        assert_eq!(t.context.journal.len(), 2);
        assert_eq!(t.context.journal.entries()[1].shares, 100);
    }

    #[test]
    fn strict_mode_rejects_zero_capital() {
        let settings = Settings {
            strict_validation: true,
            ..Settings::default()
        };
        let err = transition(
            Step::Capital,
            &WizardContext::default(),
            Event::SetCapital(0.0),
            &settings,
        )
        .unwrap_err();
        assert!(matches!(err, StockproError::InvalidInput { .. }));
    }
}
