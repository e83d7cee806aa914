//! Import wizard
//!
//! Pages implement [`WizardPage`] and are driven by [`ImportWizard`]:
//! - FileConfigPage: connection, database, schema, source file and table name
//! - SummaryPage: shows the selections, commits the import and reports status

pub mod controller;
pub mod error;
pub mod file_config;
pub mod page;
pub mod summary;

pub use controller::ImportWizard;
pub use error::{WizardError, WizardResult};
pub use file_config::{DropdownItem, FileConfigPage, FileConfigView, PopulationStep};
pub use page::{Lifecycle, PageContext, WizardPage, WizardSignals};
pub use summary::{ImportStatus, SummaryPage, SummaryView, parse_row_count};
