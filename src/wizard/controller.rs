//! Wizard controller driving page navigation

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span};
use uuid::Uuid;

use super::error::{WizardError, WizardResult};
use super::file_config::FileConfigPage;
use super::page::{Lifecycle, PageContext, WizardPage, WizardSignals};
use super::summary::{ImportStatus, SummaryPage};
use crate::config::ImportConfig;
use crate::host::{ConnectionHost, FlatFileProvider, QueryProvider};
use crate::models::{ColumnDescriptor, ImportDataModel, PageKind};

/// Owns the import model and moves it through the pages
///
/// Page order is the configuration page, any host-supplied pages added with
/// [`ImportWizard::with_page`], then the summary page. Exactly one page is active
/// at a time, and user input is only forwarded to the page that owns it while
/// that page is active.
pub struct ImportWizard {
    session_id: Uuid,
    model: ImportDataModel,
    signals: WizardSignals,
    file_config: FileConfigPage,
    extra_pages: Vec<Box<dyn WizardPage>>,
    summary: SummaryPage,
    current: Option<usize>,
}

impl ImportWizard {
    /// Create a wizard over the given host collaborators
    pub fn new(
        connections: Arc<dyn ConnectionHost>,
        queries: Arc<dyn QueryProvider>,
        flat_file: Arc<dyn FlatFileProvider>,
        config: ImportConfig,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            model: ImportDataModel::new(),
            signals: WizardSignals::default(),
            file_config: FileConfigPage::new(connections.clone(), queries.clone()),
            extra_pages: Vec::new(),
            summary: SummaryPage::new(connections, queries, flat_file, config),
            current: None,
        }
    }

    /// Create a wizard over a single object implementing every host capability
    pub fn from_host<H>(host: Arc<H>, config: ImportConfig) -> Self
    where
        H: ConnectionHost + QueryProvider + FlatFileProvider + 'static,
    {
        Self::new(host.clone(), host.clone(), host, config)
    }

    /// Insert a host-supplied page before the summary page
    pub fn with_page(mut self, page: Box<dyn WizardPage>) -> Self {
        self.extra_pages.push(page);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn model(&self) -> &ImportDataModel {
        &self.model
    }

    pub fn signals(&self) -> &WizardSignals {
        &self.signals
    }

    pub fn file_config(&self) -> &FileConfigPage {
        &self.file_config
    }

    pub fn summary(&self) -> &SummaryPage {
        &self.summary
    }

    pub fn page_count(&self) -> usize {
        self.extra_pages.len() + 2
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_kind(&self) -> Option<PageKind> {
        self.current
            .and_then(|index| self.page(index))
            .map(|page| page.kind())
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn page_titles(&self) -> Vec<&'static str> {
        (0..self.page_count())
            .filter_map(|index| self.page(index))
            .map(|page| page.title())
            .collect()
    }

    /// Start every page that has not been started and enter the first one.
    ///
    /// Fails with [`WizardError::InvalidConfig`] when the import configuration does
    /// not validate. The wizard stays closed when any step fails.
    pub async fn open(&mut self) -> WizardResult<()> {
        if self.current.is_some() {
            return Err(WizardError::InvalidNavigation(
                "wizard is already open".to_string(),
            ));
        }
        self.summary
            .config()
            .validate()
            .map_err(WizardError::InvalidConfig)?;
        let span = info_span!("import_wizard", session_id = %self.session_id);
        async {
            info!("Opening import wizard");
            for index in 0..self.page_count() {
                if let Some(page) = self.page_mut(index) {
                    if page.lifecycle() == Lifecycle::Uninitialized {
                        page.start().await?;
                    }
                }
            }
            self.enter(0).await
        }
        .instrument(span)
        .await
    }

    /// Validate and leave the active page, then enter the next one
    pub async fn next(&mut self) -> WizardResult<usize> {
        let index = self.current.ok_or(WizardError::NotOpen)?;
        if index + 1 >= self.page_count() {
            return Err(WizardError::InvalidNavigation(
                "already on the last page".to_string(),
            ));
        }
        if let Some(page) = self.page(index) {
            page.can_leave(&self.model)?;
        }

        self.leave(index).await?;
        self.enter(index + 1).await?;
        Ok(index + 1)
    }

    /// Leave the active page and re-enter the previous one
    pub async fn back(&mut self) -> WizardResult<usize> {
        let index = self.current.ok_or(WizardError::NotOpen)?;
        if index == 0 {
            return Err(WizardError::InvalidNavigation(
                "already on the first page".to_string(),
            ));
        }

        self.leave(index).await?;
        self.enter(index - 1).await?;
        Ok(index - 1)
    }

    /// Complete the wizard from the summary page and discard the session state
    pub async fn finish(&mut self) -> WizardResult<()> {
        let index = self.current.ok_or(WizardError::NotOpen)?;
        if index + 1 != self.page_count() {
            return Err(WizardError::InvalidNavigation(
                "finish is only available on the summary page".to_string(),
            ));
        }
        info!(session_id = %self.session_id, "Import wizard finished");
        self.close(index).await
    }

    /// Abandon the wizard from any page and discard the session state
    pub async fn cancel(&mut self) -> WizardResult<()> {
        let index = self.current.ok_or(WizardError::NotOpen)?;
        info!(session_id = %self.session_id, "Import wizard cancelled");
        self.close(index).await
    }

    /// Replace the sniffed column descriptors. Ignored while the summary page is active.
    pub fn set_prose_columns(&mut self, columns: Vec<ColumnDescriptor>) -> bool {
        if self.current_kind() == Some(PageKind::Summary) {
            debug!("Ignoring column update while the summary page is active");
            return false;
        }
        self.model.set_prose_columns(columns);
        true
    }

    pub async fn select_server(&mut self, connection_id: &str) -> WizardResult<bool> {
        self.file_config
            .select_server(&mut self.model, connection_id)
            .await
    }

    pub async fn select_database(&mut self, database: &str) -> WizardResult<bool> {
        self.file_config
            .select_database(&mut self.model, database)
            .await
    }

    pub fn select_schema(&mut self, schema: &str) -> WizardResult<bool> {
        self.file_config.select_schema(&mut self.model, schema)
    }

    pub fn set_file_path(&mut self, path: impl Into<std::path::PathBuf>) -> WizardResult<bool> {
        self.file_config.set_file_path(&mut self.model, path)
    }

    pub fn set_table_name(&mut self, name: impl Into<String>) -> WizardResult<bool> {
        self.file_config.set_table_name(&mut self.model, name)
    }

    /// Re-run the commit while the summary page is active
    pub async fn retry_import(&mut self) -> Option<ImportStatus> {
        if !self.summary.lifecycle().is_active() {
            debug!("Ignoring retry, summary page is not active");
            return None;
        }
        Some(self.summary.commit(&self.model).await)
    }

    async fn close(&mut self, index: usize) -> WizardResult<()> {
        self.leave(index).await?;
        self.current = None;
        self.model.reset();
        self.signals = WizardSignals::default();
        Ok(())
    }

    /// Enter the page at `index`; it becomes the current page only once entered
    async fn enter(&mut self, index: usize) -> WizardResult<()> {
        let Self {
            file_config,
            extra_pages,
            summary,
            model,
            signals,
            current,
            ..
        } = self;
        let page = page_at(file_config, extra_pages, summary, index)
            .ok_or_else(|| WizardError::InvalidNavigation(format!("no page at {}", index)))?;

        debug!(page = %page.kind(), index, "Entering page");
        let mut ctx = PageContext::new(model, signals);
        page.on_page_enter(&mut ctx).await?;
        *current = Some(index);
        Ok(())
    }

    async fn leave(&mut self, index: usize) -> WizardResult<()> {
        let Self {
            file_config,
            extra_pages,
            summary,
            model,
            signals,
            ..
        } = self;
        let page = page_at(file_config, extra_pages, summary, index)
            .ok_or_else(|| WizardError::InvalidNavigation(format!("no page at {}", index)))?;

        debug!(page = %page.kind(), index, "Leaving page");
        let mut ctx = PageContext::new(model, signals);
        page.on_page_leave(&mut ctx).await
    }

    fn page(&self, index: usize) -> Option<&dyn WizardPage> {
        let extra = self.extra_pages.len();
        if index == 0 {
            Some(&self.file_config)
        } else if index <= extra {
            Some(self.extra_pages[index - 1].as_ref())
        } else if index == extra + 1 {
            Some(&self.summary)
        } else {
            None
        }
    }

    fn page_mut(&mut self, index: usize) -> Option<&mut (dyn WizardPage + 'static)> {
        page_at(
            &mut self.file_config,
            &mut self.extra_pages,
            &mut self.summary,
            index,
        )
    }
}

fn page_at<'a>(
    file_config: &'a mut FileConfigPage,
    extra_pages: &'a mut [Box<dyn WizardPage>],
    summary: &'a mut SummaryPage,
    index: usize,
) -> Option<&'a mut (dyn WizardPage + 'static)> {
    let extra = extra_pages.len();
    if index == 0 {
        Some(file_config)
    } else if index <= extra {
        Some(extra_pages[index - 1].as_mut())
    } else if index == extra + 1 {
        Some(summary)
    } else {
        None
    }
}
