//! Page trait and lifecycle tracking

use async_trait::async_trait;

use super::error::{WizardError, WizardResult};
use crate::models::{ImportDataModel, PageKind};

/// Per-page lifecycle state
///
/// `Uninitialized → Started → Entered → (Left | Entered again)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Started,
    Entered,
    Left,
}

impl Lifecycle {
    /// Record `start`; allowed once
    pub fn start(&mut self, page: PageKind) -> WizardResult<()> {
        if *self != Lifecycle::Uninitialized {
            return Err(WizardError::AlreadyStarted(page));
        }
        *self = Lifecycle::Started;
        Ok(())
    }

    /// Record `on_page_enter`; requires a prior `start`
    pub fn enter(&mut self, page: PageKind) -> WizardResult<()> {
        if *self == Lifecycle::Uninitialized {
            return Err(WizardError::NotStarted(page));
        }
        *self = Lifecycle::Entered;
        Ok(())
    }

    /// Record `on_page_leave`. Returns whether the page was actually entered.
    pub fn leave(&mut self) -> bool {
        if *self == Lifecycle::Entered {
            *self = Lifecycle::Left;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        *self == Lifecycle::Entered
    }
}

/// Wizard-level flags pages toggle for their siblings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardSignals {
    /// "Import another file" action on the wizard footer
    pub import_another_file_visible: bool,
}

/// What the controller lends to the active page
pub struct PageContext<'a> {
    pub model: &'a mut ImportDataModel,
    pub signals: &'a mut WizardSignals,
}

impl<'a> PageContext<'a> {
    pub fn new(model: &'a mut ImportDataModel, signals: &'a mut WizardSignals) -> Self {
        Self { model, signals }
    }
}

/// A page of the import wizard
///
/// Implemented by the configuration and summary pages of this crate, and by
/// host-supplied pages such as the data preview.
#[async_trait]
pub trait WizardPage: Send {
    fn kind(&self) -> PageKind;

    fn lifecycle(&self) -> Lifecycle;

    /// One-time setup. Fails with `AlreadyStarted` on a second call.
    async fn start(&mut self) -> WizardResult<bool>;

    /// Called every time navigation arrives at this page
    async fn on_page_enter(&mut self, ctx: &mut PageContext<'_>) -> WizardResult<()>;

    /// Called when navigating away; a no-op if the page was never entered
    async fn on_page_leave(&mut self, ctx: &mut PageContext<'_>) -> WizardResult<()>;

    /// Whether forward navigation may leave this page
    fn can_leave(&self, _model: &ImportDataModel) -> WizardResult<()> {
        Ok(())
    }

    fn title(&self) -> &'static str {
        self.kind().title()
    }
}
