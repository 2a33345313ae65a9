use std::future::Future;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::models::{
    Article, ArticleFilter, ConfigUpdate, GeneratedImage, NewAccount, Platform,
    PublicationRecord, RewriteRecord, RewriteStyle, WeChatAccount,
};
use crate::pipeline::{Outcome, Pipeline};
use crate::store::{AppState, Store};
use crate::tui::{AppAction, Module};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

// Message from a finished pipeline task
pub enum PipelineEvent {
    Collected(Outcome<Vec<Article>>),
    Rewritten(Outcome<RewriteRecord>),
    Illustrated(Vec<Outcome<GeneratedImage>>),
    Regenerated(Outcome<GeneratedImage>),
    Published(Outcome<PublicationRecord>),
    ConnectionTested(Outcome<WeChatAccount>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Keyword,
    Prompt,
    Account,
}

pub struct App {
    // Data
    pub state: Arc<AppState>,
    state_rx: watch::Receiver<Arc<AppState>>,

    // View state
    pub selected_index: usize,
    pub filter: ArticleFilter,
    pub platform: Platform,
    pub keyword: String,
    pub collected: Vec<Article>,
    pub style: RewriteStyle,
    pub custom_prompt: String,
    pub latest_rewrite: Option<RewriteRecord>,
    pub paragraph: Option<usize>,
    pub account_index: usize,
    pub input_mode: Option<InputMode>,
    pub input: String,
    pub show_help: bool,
    pub status_message: Option<String>,
    spinner_frame: usize,

    // Async state
    events_tx: mpsc::Sender<PipelineEvent>,
    events_rx: mpsc::Receiver<PipelineEvent>,

    // Services
    store: Store,
    pipeline: Pipeline,
}

impl App {
    pub fn new(pipeline: Pipeline) -> Self {
        let store = pipeline.store().clone();
        let mut state_rx = store.subscribe();
        let state = Arc::clone(&state_rx.borrow_and_update());
        let (events_tx, events_rx) = mpsc::channel(16);

        Self {
            state,
            state_rx,
            selected_index: 0,
            filter: ArticleFilter::default(),
            platform: Platform::Wechat,
            keyword: String::new(),
            collected: Vec::new(),
            style: RewriteStyle::General,
            custom_prompt: String::new(),
            latest_rewrite: None,
            paragraph: None,
            account_index: 0,
            input_mode: None,
            input: String::new(),
            show_help: false,
            status_message: None,
            spinner_frame: 0,
            events_tx,
            events_rx,
            store,
            pipeline,
        }
    }

    pub fn module(&self) -> Module {
        Module::from_name(&self.state.current_module)
    }

    pub fn input_active(&self) -> bool {
        self.input_mode.is_some()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.state.is_loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Articles listed by the current module.
    pub fn module_articles(&self) -> Vec<&Article> {
        match self.module() {
            Module::Materials => self.state.filter_articles(&self.filter),
            Module::Rewrite => self.state.rewritable_articles(),
            Module::Illustration => self
                .state
                .articles
                .iter()
                .filter(|a| !a.content.trim().is_empty())
                .collect(),
            Module::Publish => self.state.publishable_articles(),
            Module::Collection => self.collected.iter().collect(),
            Module::Dashboard | Module::Settings => Vec::new(),
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.module_articles().get(self.selected_index).copied()
    }

    fn selected_article_id(&self) -> Option<String> {
        self.selected_article().map(|a| a.id.clone())
    }

    pub fn selected_account(&self) -> Option<&WeChatAccount> {
        self.state.accounts.get(self.selected_index)
    }

    /// Target account in the publish view (connected accounts only).
    pub fn publish_account(&self) -> Option<&WeChatAccount> {
        let accounts = self.state.connected_accounts();
        if accounts.is_empty() {
            return None;
        }
        accounts.get(self.account_index % accounts.len()).copied()
    }

    fn list_len(&self) -> usize {
        match self.module() {
            Module::Settings => self.state.accounts.len(),
            _ => self.module_articles().len(),
        }
    }

    /// Pick up the latest store snapshot if it changed.
    pub fn refresh_state(&mut self) {
        if self.state_rx.has_changed().unwrap_or(false) {
            self.state = Arc::clone(&self.state_rx.borrow_and_update());
            let len = self.list_len();
            if len > 0 && self.selected_index >= len {
                self.selected_index = len - 1;
            }
        }
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = PipelineEvent> + Send + 'static,
    {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await).await;
        });
    }

    fn report<T>(&mut self, outcome: &Outcome<T>, done: impl FnOnce(&T) -> String) {
        self.status_message = Some(match outcome {
            Outcome::Completed(value) => done(value),
            Outcome::Skipped(reason) => reason.to_string(),
            Outcome::Failed(failure) => format!("Failed: {}", failure.reason),
        });
    }

    pub async fn handle_action(&mut self, action: AppAction) -> bool {
        match action {
            AppAction::Quit => return true,

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                    self.paragraph = None;
                }
            }

            AppAction::MoveDown => {
                let len = self.list_len();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                    self.paragraph = None;
                }
            }

            AppAction::SwitchModule(module) => self.switch_module(module),

            AppAction::NextModule => self.switch_module(self.module().next()),

            AppAction::Collect => {
                let pipeline = self.pipeline.clone();
                let platform = self.platform;
                let keyword = self.keyword.clone();
                self.status_message = Some(format!("Collecting from {}...", platform));
                self.spawn(async move {
                    PipelineEvent::Collected(pipeline.collect(Some(platform), &keyword).await)
                });
            }

            AppAction::CyclePlatform => {
                let index = Platform::ALL
                    .iter()
                    .position(|p| *p == self.platform)
                    .unwrap_or(0);
                self.platform = Platform::ALL[(index + 1) % Platform::ALL.len()];
            }

            AppAction::EditKeyword => self.start_input(InputMode::Keyword, self.keyword.clone()),

            AppAction::Import => {
                let articles = std::mem::take(&mut self.collected);
                let outcome = self.pipeline.import(articles);
                self.report(&outcome, |n| format!("Imported {} articles", n));
                self.selected_index = 0;
            }

            AppAction::CycleStatusFilter => {
                self.filter.cycle_status();
                self.selected_index = 0;
            }

            AppAction::CycleSourceFilter => {
                self.filter.source = next_option(&self.filter.source, self.state.sources());
                self.selected_index = 0;
            }

            AppAction::CycleCategoryFilter => {
                self.filter.category = next_option(&self.filter.category, self.state.categories());
                self.selected_index = 0;
            }

            AppAction::AdvanceStatus => {
                if let Some(article) = self.selected_article() {
                    let ids = vec![article.id.clone()];
                    let status = article.status.next();
                    self.store.set_articles_status(&ids, status);
                }
            }

            AppAction::DeleteArticle => {
                if let Some(id) = self.selected_article_id() {
                    self.store.delete_article(&id);
                    self.status_message = Some(format!("Deleted article {}", id));
                }
            }

            AppAction::DeleteFiltered => {
                let ids: Vec<String> = self
                    .state
                    .filter_articles(&self.filter)
                    .iter()
                    .map(|a| a.id.clone())
                    .collect();
                self.store.delete_articles(&ids);
                self.status_message = Some(format!("Deleted {} articles", ids.len()));
                self.selected_index = 0;
            }

            AppAction::CycleStyle => self.style = self.style.cycle(),

            AppAction::EditPrompt => self.start_input(InputMode::Prompt, self.custom_prompt.clone()),

            AppAction::Rewrite => {
                let pipeline = self.pipeline.clone();
                let article_id = self.selected_article_id();
                let style = self.style;
                let prompt = self.custom_prompt.clone();
                self.spawn(async move {
                    let custom = (!prompt.is_empty()).then_some(prompt.as_str());
                    PipelineEvent::Rewritten(
                        pipeline.rewrite(article_id.as_deref(), style, custom).await,
                    )
                });
            }

            AppAction::ApplyRewrite => {
                if let Some(record) = self.latest_rewrite.clone() {
                    let outcome = self.pipeline.apply_rewrite(&record);
                    self.report(&outcome, |_| "Rewrite applied".to_string());
                }
            }

            AppAction::CycleParagraph => {
                let count = self
                    .selected_article()
                    .map(|a| a.paragraphs().len())
                    .unwrap_or(0);
                self.paragraph = match self.paragraph {
                    None if count > 0 => Some(0),
                    Some(i) if i + 1 < count => Some(i + 1),
                    _ => None,
                };
            }

            AppAction::Illustrate => {
                let pipeline = self.pipeline.clone();
                let article_id = self.selected_article_id();
                let paragraph = self.paragraph;
                let prompt = self.custom_prompt.clone();
                self.spawn(async move {
                    let custom = (!prompt.is_empty()).then_some(prompt.as_str());
                    let outcome = pipeline
                        .illustrate(article_id.as_deref(), paragraph, custom)
                        .await;
                    PipelineEvent::Illustrated(vec![outcome])
                });
            }

            AppAction::IllustrateAll => {
                if let Some(article) = self.selected_article() {
                    let pipeline = self.pipeline.clone();
                    let article_id = article.id.clone();
                    let indices: Vec<usize> = (0..article.paragraphs().len()).collect();
                    self.spawn(async move {
                        PipelineEvent::Illustrated(
                            pipeline.illustrate_paragraphs(&article_id, &indices).await,
                        )
                    });
                }
            }

            AppAction::RegenerateImage => {
                if let Some(image_id) = self.latest_image_id() {
                    let pipeline = self.pipeline.clone();
                    self.spawn(async move {
                        PipelineEvent::Regenerated(pipeline.regenerate_image(&image_id).await)
                    });
                }
            }

            AppAction::DeleteImage => {
                if let Some(image_id) = self.latest_image_id() {
                    self.pipeline.delete_image(&image_id);
                }
            }

            AppAction::CycleAccount => {
                self.account_index = self.account_index.wrapping_add(1);
            }

            AppAction::Publish => {
                let pipeline = self.pipeline.clone();
                let article_id = self.selected_article_id();
                let account_id = self.publish_account().map(|a| a.id.clone());
                self.spawn(async move {
                    PipelineEvent::Published(
                        pipeline
                            .publish(article_id.as_deref(), account_id.as_deref())
                            .await,
                    )
                });
            }

            AppAction::ToggleTheme => {
                self.store.update_config(ConfigUpdate {
                    theme: Some(self.state.config.theme.toggled()),
                    ..ConfigUpdate::default()
                });
            }

            AppAction::ToggleAutoRewrite => {
                self.store.update_config(ConfigUpdate {
                    auto_rewrite: Some(!self.state.config.auto_rewrite),
                    ..ConfigUpdate::default()
                });
            }

            AppAction::AddAccount => self.start_input(InputMode::Account, String::new()),

            AppAction::TestConnection => {
                if let Some(account) = self.selected_account() {
                    let pipeline = self.pipeline.clone();
                    let account_id = account.id.clone();
                    self.spawn(async move {
                        PipelineEvent::ConnectionTested(pipeline.test_connection(&account_id).await)
                    });
                }
            }

            AppAction::RemoveAccount => {
                if let Some(account) = self.selected_account() {
                    let account_id = account.id.clone();
                    let outcome = self.pipeline.remove_account(&account_id);
                    self.report(&outcome, |_| format!("Removed account {}", account_id));
                }
            }

            AppAction::ShowHelp => self.show_help = true,

            AppAction::HideHelp => self.show_help = false,

            AppAction::InputChar(c) => self.input.push(c),

            AppAction::InputBackspace => {
                self.input.pop();
            }

            AppAction::InputConfirm => self.confirm_input(),

            AppAction::InputCancel => {
                self.input_mode = None;
                self.input.clear();
            }
        }

        false
    }

    fn switch_module(&mut self, module: Module) {
        self.store.set_current_module(module.key());
        self.selected_index = 0;
        self.paragraph = None;
    }

    fn start_input(&mut self, mode: InputMode, initial: String) {
        self.input_mode = Some(mode);
        self.input = initial;
    }

    fn confirm_input(&mut self) {
        let input = std::mem::take(&mut self.input);
        match self.input_mode.take() {
            Some(InputMode::Keyword) => self.keyword = input.trim().to_string(),
            Some(InputMode::Prompt) => self.custom_prompt = input.trim().to_string(),
            Some(InputMode::Account) => {
                // "name, app id"
                let (name, app_id) = input.split_once(',').unwrap_or((input.as_str(), ""));
                let outcome = self.pipeline.add_account(NewAccount {
                    name: name.to_string(),
                    app_id: app_id.to_string(),
                });
                self.report(&outcome, |a| format!("Added account {}", a.name));
            }
            None => {}
        }
    }

    /// Newest image of the selected article.
    fn latest_image_id(&self) -> Option<String> {
        let article = self.selected_article()?;
        self.state
            .images_for(&article.id)
            .last()
            .map(|i| i.id.clone())
    }

    /// Poll for finished pipeline tasks (non-blocking)
    pub fn poll_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                PipelineEvent::Collected(outcome) => {
                    self.report(&outcome, |a| {
                        format!("Collected {} articles, press 'i' to import", a.len())
                    });
                    if let Some(articles) = outcome.completed() {
                        self.collected = articles;
                    }
                }
                PipelineEvent::Rewritten(outcome) => {
                    self.report(&outcome, |r| format!("Rewritten: {}", r.rewritten_title));
                    if let Some(record) = outcome.completed() {
                        self.latest_rewrite = Some(record);
                    }
                }
                PipelineEvent::Illustrated(outcomes) => {
                    let done = outcomes.iter().filter(|o| o.is_completed()).count();
                    match outcomes.iter().find(|o| !o.is_completed()) {
                        Some(other) => self.report(other, |_| String::new()),
                        None => {
                            self.status_message = Some(format!("Generated {} images", done))
                        }
                    }
                }
                PipelineEvent::Regenerated(outcome) => {
                    self.report(&outcome, |_| "Image regenerated".to_string());
                }
                PipelineEvent::Published(outcome) => {
                    self.report(&outcome, |p| {
                        format!("Published \"{}\" ({} views)", p.title, p.view_count.unwrap_or(0))
                    });
                }
                PipelineEvent::ConnectionTested(outcome) => {
                    self.report(&outcome, |a| format!("{} is connected", a.name));
                }
            }
        }
    }
}

/// Step a filter criterion through `values`, then back to `None`.
fn next_option(current: &Option<String>, values: Vec<&str>) -> Option<String> {
    let next = match current {
        None => values.first(),
        Some(value) => values
            .iter()
            .position(|v| v == value)
            .and_then(|i| values.get(i + 1)),
    };
    next.map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppConfig, ArticleStatus, Theme};

    fn app() -> App {
        App::new(Pipeline::simulated(Store::new(AppConfig::default())))
    }

    #[tokio::test]
    async fn switching_module_updates_store() {
        let mut app = app();

        app.handle_action(AppAction::SwitchModule(Module::Publish)).await;
        app.refresh_state();

        assert_eq!(app.state.current_module, "publish");
        assert_eq!(app.module(), Module::Publish);
        let ids: Vec<&str> = app
            .module_articles()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[tokio::test]
    async fn materials_filter_and_status() {
        let mut app = app();
        app.handle_action(AppAction::SwitchModule(Module::Materials)).await;
        app.refresh_state();
        assert_eq!(app.module_articles().len(), 3);

        app.handle_action(AppAction::CycleStatusFilter).await;
        assert_eq!(app.module_articles().len(), 1);

        app.handle_action(AppAction::AdvanceStatus).await;
        app.refresh_state();
        assert!(app.module_articles().is_empty());
        assert_eq!(
            app.state.article("1").unwrap().status,
            ArticleStatus::Rewritten
        );
    }

    #[tokio::test]
    async fn source_filter_cycles_back_to_all() {
        let mut app = app();
        app.handle_action(AppAction::SwitchModule(Module::Materials)).await;
        app.refresh_state();
        let sources: Vec<String> = app.state.sources().iter().map(|s| s.to_string()).collect();

        for source in &sources {
            app.handle_action(AppAction::CycleSourceFilter).await;
            assert_eq!(app.filter.source.as_ref(), Some(source));
            assert!(app.module_articles().iter().all(|a| &a.source == source));
        }
        app.handle_action(AppAction::CycleSourceFilter).await;
        assert_eq!(app.filter.source, None);
    }

    #[tokio::test]
    async fn delete_filtered_removes_only_matches() {
        let mut app = app();
        app.handle_action(AppAction::SwitchModule(Module::Materials)).await;
        app.handle_action(AppAction::CycleStatusFilter).await;
        app.handle_action(AppAction::DeleteFiltered).await;
        app.refresh_state();

        assert_eq!(app.state.articles.len(), 2);
        assert!(app.state.article("1").is_none());
    }

    #[tokio::test]
    async fn theme_toggle_goes_through_config() {
        let mut app = app();

        app.handle_action(AppAction::ToggleTheme).await;
        app.refresh_state();

        assert_eq!(app.state.config.theme, Theme::Dark);
    }

    #[tokio::test]
    async fn account_input_adds_account() {
        let mut app = app();
        app.handle_action(AppAction::AddAccount).await;
        for c in "Rust Daily,wx77".chars() {
            app.handle_action(AppAction::InputChar(c)).await;
        }
        app.handle_action(AppAction::InputConfirm).await;
        app.refresh_state();

        assert!(!app.input_active());
        assert_eq!(app.state.accounts.len(), 3);
        assert_eq!(app.state.accounts[2].app_id, "wx77");
    }

    #[tokio::test(start_paused = true)]
    async fn collected_articles_arrive_through_events() {
        let mut app = app();
        app.handle_action(AppAction::SwitchModule(Module::Collection)).await;
        app.handle_action(AppAction::Collect).await;

        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
        app.poll_events();
        assert_eq!(app.collected.len(), 2);

        app.handle_action(AppAction::Import).await;
        app.refresh_state();
        assert!(app.collected.is_empty());
        assert_eq!(app.state.articles.len(), 5);
    }
}
