use crate::api::{ApiClient, ApiError, Article, AskResponse, ReceivedNotification};
use crate::feed::{ArticleStore, ExpansionSet, PageOutcome, PageRequest, Pagination, ScrollMonitor};
use crate::keybindings::KeybindingRegistry;
use crate::notify::{ChannelState, NotificationChannel};
use crate::question::{AskRequest, QuestionDialog, SubmitSkipped};
use crate::theme::{StyleMap, ThemeVariant};
use crate::util::catch_task_panic;
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// Number of frames in the loading spinner animation.
pub const SPINNER_FRAMES: usize = 10;

/// Events sent from background tasks to the UI task.
///
/// All state mutation happens on the UI task; spawned work only reports
/// through this channel.
#[derive(Debug)]
pub enum AppEvent {
    /// A page fetch finished. `request` identifies which one so results of
    /// superseded fetches can be discarded.
    PageLoaded {
        request: PageRequest,
        result: Result<Vec<Article>, ApiError>,
    },
    /// A question request finished.
    AnswerReceived {
        request: AskRequest,
        result: Result<AskResponse, ApiError>,
    },
    /// A `new_article` notification arrived on the push channel.
    Notification(ReceivedNotification),
    /// The push channel opened or closed. `epoch` names the subscription.
    ChannelStatus { epoch: u64, state: ChannelState },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked ("page_load", "ask", "notifications")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

pub struct App {
    pub api: ApiClient,

    // Feed
    pub store: ArticleStore,
    pub pagination: Pagination,
    pub expansion: ExpansionSet,
    pub scroll: ScrollMonitor,
    /// Index of the highlighted card.
    pub selected: usize,
    /// `[start, end)` content rows of every card, from the last frame.
    card_spans: Vec<(usize, usize)>,

    // Push channel
    /// Received notifications, newest first.
    pub notifications: Vec<ReceivedNotification>,
    pub channel_state: ChannelState,
    channel: Option<NotificationChannel>,
    channel_epoch: u64,

    // Question dialog
    pub question: QuestionDialog,
    /// Request the dialog is waiting on, kept so a panicked task can still
    /// resolve it.
    pending_ask: Option<AskRequest>,

    // Background tasks
    page_load_handle: Option<JoinHandle<()>>,
    ask_handle: Option<JoinHandle<()>>,

    // Presentation
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set whenever state changes; the render loop clears it after drawing.
    pub needs_redraw: bool,
    pub spinner_frame: usize,
    pub show_help: bool,
    pub help_scroll_offset: usize,
    pub show_notifications: bool,
    pub notifications_scroll: usize,
    pub answer_scroll: usize,
}

impl App {
    pub fn new(
        api: ApiClient,
        theme_variant: ThemeVariant,
        keybindings: KeybindingRegistry,
        load_more_threshold: u16,
    ) -> Self {
        Self {
            api,
            store: ArticleStore::new(),
            pagination: Pagination::new(),
            expansion: ExpansionSet::new(),
            scroll: ScrollMonitor::new(load_more_threshold),
            selected: 0,
            card_spans: Vec::new(),
            notifications: Vec::new(),
            channel_state: ChannelState::Connecting,
            channel: None,
            channel_epoch: 0,
            question: QuestionDialog::new(),
            pending_ask: None,
            page_load_handle: None,
            ask_handle: None,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
            help_scroll_offset: 0,
            show_notifications: false,
            notifications_scroll: 0,
            answer_scroll: 0,
        }
    }

    // ------------------------------------------------------------------
    // Theme and status
    // ------------------------------------------------------------------

    /// Resolve a semantic role name to a ratatui `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for the status bar.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Clear the status message once it is older than three seconds.
    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Advance the spinner while something is in flight. Returns true if a
    /// redraw is needed.
    pub fn tick_spinner(&mut self) -> bool {
        if self.pagination.is_loading() || self.question.is_pending() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES;
            true
        } else {
            false
        }
    }

    // ------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------

    /// Fetch page `page`, superseding and aborting any fetch in flight.
    pub fn load_page(&mut self, page: usize, tx: &mpsc::Sender<AppEvent>) -> PageRequest {
        let request = self.pagination.begin(page);
        self.spawn_page_load(request, tx);
        request
    }

    /// Reload page zero.
    pub fn refresh(&mut self, tx: &mpsc::Sender<AppEvent>) -> PageRequest {
        self.load_page(0, tx)
    }

    /// Fetch the page after the current one unless a fetch is in flight.
    pub fn load_more(&mut self, tx: &mpsc::Sender<AppEvent>) -> Option<PageRequest> {
        let request = self.pagination.begin_next()?;
        self.spawn_page_load(request, tx);
        Some(request)
    }

    fn spawn_page_load(&mut self, request: PageRequest, tx: &mpsc::Sender<AppEvent>) {
        if let Some(handle) = self.page_load_handle.take() {
            handle.abort();
        }
        self.needs_redraw = true;

        let api = self.api.clone();
        let tx = tx.clone();
        tracing::debug!(page = request.page, seq = request.seq, "Spawning page load");

        self.page_load_handle = Some(tokio::spawn(async move {
            let tx_panic = tx.clone();
            let work = async move {
                let result = api.fetch_articles(request.page).await;
                if tx.send(AppEvent::PageLoaded { request, result }).await.is_err() {
                    tracing::debug!(page = request.page, "Page result dropped (receiver gone)");
                }
            };
            if let Err(panic_msg) = catch_task_panic(work).await {
                tracing::error!(task = "page_load", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "page_load",
                        error: panic_msg,
                    })
                    .await;
            }
        }));
    }

    /// Apply a finished page fetch to the store.
    pub fn on_page_loaded(
        &mut self,
        request: PageRequest,
        result: Result<Vec<Article>, ApiError>,
    ) -> PageOutcome {
        let outcome = self.pagination.complete(request, result, &mut self.store);
        if outcome != PageOutcome::Stale {
            self.page_load_handle = None;
        }
        if let PageOutcome::Replaced { .. } = outcome {
            self.selected = self.selected.min(self.store.len().saturating_sub(1));
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Scrolling and selection
    // ------------------------------------------------------------------

    /// Record the geometry of the frame just drawn.
    pub fn update_layout(&mut self, viewport: usize, content: usize, card_spans: Vec<(usize, usize)>) {
        self.scroll.set_extent(viewport, content);
        self.card_spans = card_spans;
    }

    pub fn card_spans(&self) -> &[(usize, usize)] {
        &self.card_spans
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.store.get(self.selected)
    }

    /// Load the next page when the viewport is near the end of the feed.
    /// Returns true if a fetch was issued.
    fn check_load_more(&mut self, tx: &mpsc::Sender<AppEvent>) -> bool {
        if !self.scroll.near_bottom() {
            return false;
        }
        match self.load_more(tx) {
            Some(request) => {
                tracing::debug!(page = request.page, offset = self.scroll.offset(), "Near bottom, loading more");
                true
            }
            None => false,
        }
    }

    /// Scroll the feed by `delta` lines and evaluate the load-more trigger.
    pub fn scroll_feed(&mut self, delta: isize, tx: &mpsc::Sender<AppEvent>) {
        if self.scroll.scroll_by(delta) {
            self.follow_scroll();
            self.needs_redraw = true;
        }
        self.check_load_more(tx);
    }

    /// Half the viewport, at least one line.
    pub fn half_page(&self) -> isize {
        (self.scroll.viewport() / 2).max(1) as isize
    }

    pub fn scroll_to_top(&mut self) {
        if self.scroll.scroll_to(0) {
            self.needs_redraw = true;
        }
        self.selected = 0;
    }

    pub fn scroll_to_bottom(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.scroll.scroll_to_bottom() {
            self.needs_redraw = true;
        }
        self.selected = self.store.len().saturating_sub(1);
        self.check_load_more(tx);
    }

    pub fn select_next(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
            self.needs_redraw = true;
        }
        self.reveal_selected(tx);
    }

    pub fn select_prev(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.selected > 0 {
            self.selected -= 1;
            self.needs_redraw = true;
        }
        self.reveal_selected(tx);
    }

    /// Bring the selected card into view. Moving the viewport, or reaching
    /// the last card, counts as a scroll request.
    fn reveal_selected(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let moved = match self.card_spans.get(self.selected) {
            Some(&(start, end)) => self.scroll.reveal(start, end),
            None => false,
        };
        let at_last = self.selected + 1 >= self.store.len();
        if moved || at_last {
            self.check_load_more(tx);
        }
    }

    /// Keep the selection on a visible card after a free scroll.
    fn follow_scroll(&mut self) {
        let top = self.scroll.offset();
        let bottom = top + self.scroll.viewport();
        let visible = |&(start, end): &(usize, usize)| end > top && start < bottom;
        if self.card_spans.get(self.selected).is_some_and(visible) {
            return;
        }
        if let Some(index) = self.card_spans.iter().position(visible) {
            self.selected = index;
        }
    }

    /// Flip the selected card between clamped and full body.
    pub fn toggle_expand_selected(&mut self) -> Option<bool> {
        let id = self.selected_article()?.id.clone();
        let expanded = self.expansion.toggle(&id);
        self.needs_redraw = true;
        Some(expanded)
    }

    // ------------------------------------------------------------------
    // Question dialog
    // ------------------------------------------------------------------

    /// Open the question dialog for the selected article.
    pub fn open_question(&mut self) -> bool {
        let Some(article) = self.selected_article().cloned() else {
            return false;
        };
        self.abort_ask();
        self.question.open(article);
        self.answer_scroll = 0;
        self.needs_redraw = true;
        true
    }

    /// Close the dialog and abandon any request in flight.
    pub fn close_question(&mut self) {
        self.abort_ask();
        self.question.close();
        self.answer_scroll = 0;
        self.needs_redraw = true;
    }

    fn abort_ask(&mut self) {
        if let Some(handle) = self.ask_handle.take() {
            handle.abort();
        }
        self.pending_ask = None;
    }

    /// Send the typed question. Blank questions, a closed dialog, or a
    /// request already in flight are skipped without contacting the server.
    pub fn submit_question(&mut self, tx: &mpsc::Sender<AppEvent>) -> Result<(), SubmitSkipped> {
        let request = match self.question.submit() {
            Ok(request) => request,
            Err(skipped) => {
                tracing::debug!(reason = ?skipped, "Question submit skipped");
                return Err(skipped);
            }
        };
        self.needs_redraw = true;
        self.pending_ask = Some(request.clone());

        let api = self.api.clone();
        let tx = tx.clone();
        tracing::debug!(article_id = %request.article_id, token = request.token, "Spawning question request");

        self.ask_handle = Some(tokio::spawn(async move {
            let tx_panic = tx.clone();
            let work = async move {
                let result = api.ask(&request.article_id, &request.question).await;
                let _ = tx.send(AppEvent::AnswerReceived { request, result }).await;
            };
            if let Err(panic_msg) = catch_task_panic(work).await {
                tracing::error!(task = "ask", error = %panic_msg, "Background task panicked");
                let _ = tx_panic
                    .send(AppEvent::TaskPanicked {
                        task: "ask",
                        error: panic_msg,
                    })
                    .await;
            }
        }));
        Ok(())
    }

    /// Store an answer. Returns false if it belongs to a session that is gone.
    pub fn on_answer(&mut self, request: &AskRequest, result: Result<AskResponse, ApiError>) -> bool {
        if self.pending_ask.as_ref() == Some(request) {
            self.pending_ask = None;
            self.ask_handle = None;
        }
        let applied = self.question.resolve(request, result);
        if applied {
            self.answer_scroll = 0;
        }
        applied
    }

    // ------------------------------------------------------------------
    // Push channel
    // ------------------------------------------------------------------

    /// Open a fresh subscription, closing the current one first.
    pub fn connect_notifications(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
        }
        self.channel_epoch = self.channel_epoch.wrapping_add(1);
        self.channel_state = ChannelState::Connecting;
        self.channel = Some(NotificationChannel::open(
            self.api.clone(),
            self.channel_epoch,
            tx.clone(),
        ));
        self.needs_redraw = true;
    }

    /// Re-open the channel if it is closed. Returns false if it is still
    /// connecting or live.
    pub fn reconnect_notifications(&mut self, tx: &mpsc::Sender<AppEvent>) -> bool {
        if !self.channel_state.is_closed() {
            return false;
        }
        self.connect_notifications(tx);
        true
    }

    /// Apply a status report from the channel task. Reports from an earlier
    /// subscription are ignored.
    pub fn on_channel_status(&mut self, epoch: u64, state: ChannelState) -> bool {
        if epoch != self.channel_epoch {
            tracing::debug!(epoch, current = self.channel_epoch, "Ignoring status from old channel");
            return false;
        }
        if state.is_closed() {
            if let Some(mut channel) = self.channel.take() {
                channel.close();
            }
        }
        self.channel_state = state;
        self.needs_redraw = true;
        true
    }

    /// Record a new-article notification and reload the first page.
    pub fn on_notification(&mut self, received: ReceivedNotification, tx: &mpsc::Sender<AppEvent>) {
        if !received.notification.is_new_article() {
            return;
        }
        self.notifications.insert(0, received);
        if self.notifications_scroll > 0 {
            self.notifications_scroll += 1;
        }
        self.load_page(0, tx);
    }

    /// Recover component state after a background task died.
    pub fn on_task_panicked(&mut self, task: &'static str) {
        match task {
            "page_load" => {
                self.page_load_handle = None;
                self.pagination.cancel();
            }
            "ask" => {
                self.ask_handle = None;
                if let Some(request) = self.pending_ask.take() {
                    self.question.fail(&request);
                }
            }
            "notifications" => {
                self.channel = None;
                self.channel_state = ChannelState::closed("notification task panicked");
            }
            _ => {}
        }
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Abort in-flight requests and close the push channel.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.page_load_handle.take() {
            handle.abort();
        }
        self.pagination.cancel();
        self.abort_ask();
        if let Some(mut channel) = self.channel.take() {
            channel.close();
        }
        tracing::debug!("Application state shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Notification, NotificationArticle};
    use crate::feed::store::tests::article;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn test_app() -> App {
        // Port 9 is discard; spawned requests fail fast or are aborted.
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        App::new(api, ThemeVariant::Dark, KeybindingRegistry::new(), 5)
    }

    fn load(app: &mut App, articles: Vec<Article>, tx: &mpsc::Sender<AppEvent>) {
        let request = app.load_page(0, tx);
        app.on_page_loaded(request, Ok(articles));
    }

    fn notification(event: &str, id: i64) -> ReceivedNotification {
        ReceivedNotification::now(Notification {
            event: event.to_string(),
            message: String::new(),
            article: NotificationArticle {
                id,
                title: format!("Article {}", id),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_set_status_and_expiry() {
        let mut app = test_app();
        app.set_status("hello");
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        app.status_message = Some((Cow::Borrowed("old"), Instant::now() - Duration::from_secs(4)));
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = test_app();
        app.needs_redraw = false;
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert!(app.needs_redraw);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[test]
    fn test_style_follows_theme() {
        let mut app = test_app();
        let dark = app.style("card_border_selected");
        app.set_theme(ThemeVariant::Light);
        assert_ne!(app.style("card_border_selected"), dark);
    }

    #[tokio::test]
    async fn test_refresh_replaces_and_clamps_selection() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        load(&mut app, vec![article("1"), article("2"), article("3")], &tx);
        app.selected = 2;

        load(&mut app, vec![article("9")], &tx);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected, 0);
        assert!(!app.pagination.is_loading());
    }

    #[tokio::test]
    async fn test_load_more_suppressed_while_loading() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.load_page(0, &tx);
        assert!(app.load_more(&tx).is_none());
        app.shutdown();
    }

    #[tokio::test]
    async fn test_scroll_near_bottom_requests_next_page() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        load(&mut app, vec![article("1"), article("2")], &tx);
        app.update_layout(10, 40, vec![(0, 20), (20, 40)]);

        app.scroll_feed(3, &tx);
        assert!(!app.pagination.is_loading());

        app.scroll_feed(25, &tx);
        let request = app.pagination.in_flight().unwrap();
        assert_eq!(request.page, 1);

        // A second trigger while in flight is suppressed
        app.scroll_feed(5, &tx);
        assert_eq!(app.pagination.in_flight(), Some(request));
        app.shutdown();
    }

    #[tokio::test]
    async fn test_free_scroll_moves_selection_onto_screen() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        load(&mut app, vec![article("1"), article("2"), article("3")], &tx);
        app.update_layout(5, 60, vec![(0, 20), (20, 40), (40, 60)]);

        app.scroll_feed(25, &tx);
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_select_next_reveals_card() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        load(&mut app, vec![article("1"), article("2"), article("3")], &tx);
        app.update_layout(10, 60, vec![(0, 20), (20, 40), (40, 60)]);

        app.select_next(&tx);
        assert_eq!(app.selected, 1);
        assert!(app.scroll.offset() > 0);
        app.select_prev(&tx);
        assert_eq!(app.selected, 0);
        assert_eq!(app.scroll.offset(), 0);
        app.shutdown();
    }

    #[tokio::test]
    async fn test_toggle_expand_selected() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        assert_eq!(app.toggle_expand_selected(), None);

        load(&mut app, vec![article("1")], &tx);
        assert_eq!(app.toggle_expand_selected(), Some(true));
        assert!(app.expansion.is_expanded("1"));
        assert_eq!(app.toggle_expand_selected(), Some(false));
    }

    #[tokio::test]
    async fn test_notification_prepends_and_refreshes_once() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.on_notification(notification("new_article", 1), &tx);
        let first = app.pagination.in_flight().unwrap();
        assert_eq!(first.page, 0);

        app.on_notification(notification("new_article", 2), &tx);
        let second = app.pagination.in_flight().unwrap();
        assert_eq!(second.page, 0);
        assert!(second.seq > first.seq);

        let ids: Vec<i64> = app.notifications.iter().map(|n| n.notification.article.id).collect();
        assert_eq!(ids, vec![2, 1]);

        // The superseded result is ignored
        assert_eq!(app.on_page_loaded(first, Ok(vec![article("x")])), PageOutcome::Stale);
        assert!(app.store.is_empty());
        app.shutdown();
    }

    #[tokio::test]
    async fn test_other_notifications_are_ignored() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.on_notification(notification("heartbeat", 1), &tx);
        assert!(app.notifications.is_empty());
        assert!(!app.pagination.is_loading());
    }

    #[tokio::test]
    async fn test_channel_status_from_old_epoch_is_ignored() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.connect_notifications(&tx);
        app.connect_notifications(&tx);

        assert!(!app.on_channel_status(1, ChannelState::Live));
        assert_eq!(app.channel_state, ChannelState::Connecting);
        assert!(app.on_channel_status(2, ChannelState::closed("gone")));
        assert!(app.channel_state.is_closed());
        app.shutdown();
    }

    #[tokio::test]
    async fn test_reconnect_only_when_closed() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.connect_notifications(&tx);
        assert!(!app.reconnect_notifications(&tx));

        app.on_channel_status(1, ChannelState::closed("boom"));
        assert!(app.reconnect_notifications(&tx));
        assert_eq!(app.channel_state, ChannelState::Connecting);
        app.shutdown();
    }

    #[tokio::test]
    async fn test_question_flow_drops_answer_after_close() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        assert!(!app.open_question());

        load(&mut app, vec![article("7")], &tx);
        assert!(app.open_question());
        assert_eq!(app.submit_question(&tx), Err(SubmitSkipped::EmptyQuestion));

        app.question.push_char('?');
        app.submit_question(&tx).unwrap();
        let request = app.pending_ask.clone().unwrap();
        app.close_question();

        assert!(!app.on_answer(&request, Ok(AskResponse { answer: Some("late".into()) })));
        assert!(!app.question.is_open());
    }

    #[tokio::test]
    async fn test_ask_panic_resolves_dialog() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        load(&mut app, vec![article("7")], &tx);
        app.open_question();
        app.question.push_char('q');
        app.submit_question(&tx).unwrap();

        app.on_task_panicked("ask");
        assert!(!app.question.is_pending());
        assert!(app.question.active().unwrap().answer.is_some());
        app.shutdown();
    }

    #[tokio::test]
    async fn test_page_load_panic_clears_loading() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.load_page(0, &tx);
        app.on_task_panicked("page_load");
        assert!(!app.pagination.is_loading());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_everything() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        app.connect_notifications(&tx);
        app.load_page(0, &tx);
        app.shutdown();
        assert!(!app.pagination.is_loading());
        assert!(app.channel.is_none());
        // Idempotent
        app.shutdown();
    }

    #[tokio::test]
    async fn test_spinner_advances_only_while_busy() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = test_app();
        assert!(!app.tick_spinner());
        app.load_page(0, &tx);
        assert!(app.tick_spinner());
        assert_eq!(app.spinner_frame, 1);
        app.shutdown();
    }
}
