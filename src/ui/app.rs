//! Main application state and logic.

use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, warn};

use super::theme::{icons, Theme, ThemeName};
use super::widgets::{truncate, ChatTranscript, EmptyState, KeyHints, LessonCard, Logo, ScoreGauges};
use crate::auth::{self, AuthRequest};
use crate::catalog::CatalogStore;
use crate::clock::{Clock, Delayed};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::models::{LessonType, Level, User};
use crate::practice::{ChatSession, VoiceRecorder};
use crate::progress::{LevelStatus, ProgressSummary};
use crate::query::QueryParams;
use crate::quiz::{QuestionBank, TutorSession, MAX_QUESTIONS};
use crate::state::{persist_transition, reduce, Action, AppState, Page, View};
use crate::storage::KeyValueStore;

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Password,
}

impl FormField {
    fn label(&self) -> &'static str {
        match self {
            FormField::Name => " Full Name ",
            FormField::Email => " Email ",
            FormField::Password => " Password ",
        }
    }

    fn for_page(page: Page) -> &'static [FormField] {
        match page {
            Page::Signup => &[FormField::Name, FormField::Email, FormField::Password],
            _ => &[FormField::Email, FormField::Password],
        }
    }
}

/// Contents of the login or signup form.
#[derive(Default)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub focus: usize,
    pub error: Option<String>,
    pub pending: Option<Delayed<User>>,
}

impl AuthForm {
    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
        }
    }

    fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonPopup {
    Preview(u32),
    Started(u32),
}

/// Which tutor panel takes keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TutorFocus {
    #[default]
    Ask,
    Quiz,
}

pub struct App {
    pub running: bool,
    pub state: AppState,

    pub theme: Theme,

    // Collaborators
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,

    // Lessons
    pub catalog: CatalogStore,
    pub params: QueryParams,
    pub search_input: String,
    pub search_focused: bool,
    search_debounce: Debouncer<String>,
    pub results: Vec<u32>,
    pub lesson_list_state: ListState,
    pub tag_picker: Option<ListState>,
    pub popup: Option<LessonPopup>,

    // Dashboard
    pub progress: ProgressSummary,

    // Login / signup
    pub form: AuthForm,

    // Practice
    pub chat: ChatSession,
    pub chat_input: String,
    pub mic: VoiceRecorder,

    // Tutor
    pub tutor: TutorSession,
    pub tutor_input: String,
    pub tutor_focus: TutorFocus,
    pub quiz_cursor: usize,
    pub tutor_warning: Option<String>,

    // Status message (shown temporarily)
    pub status_message: Option<(String, Instant)>,
    spinner_frame: usize,
}

impl App {
    pub fn new(
        catalog: CatalogStore,
        store: Rc<dyn KeyValueStore>,
        config: Config,
        bank: QuestionBank,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let state = AppState::restore(store.as_ref(), ThemeName::from_str(&config.theme));
        let theme = Theme::new(state.theme);
        let search_debounce = Debouncer::new(clock.clone(), config.search_debounce());

        let mut app = Self {
            running: true,
            state,
            theme,
            store,
            clock: clock.clone(),
            catalog,
            params: QueryParams::default(),
            search_input: String::new(),
            search_focused: false,
            search_debounce,
            results: Vec::new(),
            lesson_list_state: ListState::default(),
            tag_picker: None,
            popup: None,
            progress: ProgressSummary::sample(),
            form: AuthForm::default(),
            chat: ChatSession::new(clock.clone()),
            chat_input: String::new(),
            mic: VoiceRecorder::new(clock.clone()),
            tutor: TutorSession::new(clock, bank, rand::random()),
            tutor_input: String::new(),
            tutor_focus: TutorFocus::default(),
            quiz_cursor: 0,
            tutor_warning: None,
            status_message: None,
            spinner_frame: 0,
        };
        app.refresh_results();
        app
    }

    /// Run `action` through the reducer and persist what changed.
    pub fn dispatch(&mut self, action: Action) {
        let next = reduce(self.state.clone(), &action);
        persist_transition(&self.state, &next, self.store.as_ref());

        if next.theme != self.state.theme {
            self.theme = Theme::new(next.theme);
        }
        self.state = next;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, self.clock.now()));
    }

    /// Re-run the lesson query and keep the selection in range.
    pub fn refresh_results(&mut self) {
        self.results = self.catalog.query(&self.params).iter().map(|l| l.id).collect();
        debug!(
            search = %self.params.search,
            sort = %self.params.sort,
            matches = self.results.len(),
            "Lesson query recomputed"
        );

        let selected = match self.lesson_list_state.selected() {
            _ if self.results.is_empty() => None,
            Some(i) => Some(i.min(self.results.len() - 1)),
            None => Some(0),
        };
        self.lesson_list_state.select(selected);
    }

    pub fn selected_lesson_id(&self) -> Option<u32> {
        self.lesson_list_state
            .selected()
            .and_then(|i| self.results.get(i).copied())
    }

    /// True while typed search text is waiting to be applied.
    pub fn is_searching(&self) -> bool {
        self.search_debounce.is_pending()
    }

    fn update_search(&mut self) {
        self.search_debounce.call(self.search_input.clone());
    }

    pub fn clear_filters(&mut self) {
        self.search_debounce.cancel();
        self.search_input.clear();
        self.params = QueryParams::default();
        self.refresh_results();
    }

    pub fn toggle_favorite_selected(&mut self) {
        if let Some(id) = self.selected_lesson_id() {
            match self.catalog.toggle_favorite(id) {
                Ok(true) => self.set_status("Added to favorites".to_string()),
                Ok(false) => self.set_status("Removed from favorites".to_string()),
                Err(e) => warn!(error = %e, "Cannot favorite lesson"),
            }
        }
    }

    pub fn toggle_bookmark_selected(&mut self) {
        if let Some(id) = self.selected_lesson_id() {
            match self.catalog.toggle_bookmark(id) {
                Ok(true) => self.set_status("Bookmarked".to_string()),
                Ok(false) => self.set_status("Bookmark removed".to_string()),
                Err(e) => warn!(error = %e, "Cannot bookmark lesson"),
            }
        }
    }

    pub fn start_selected_lesson(&mut self) {
        if let Some(id) = self.selected_lesson_id() {
            if let Err(e) = self.catalog.record_view(id) {
                warn!(error = %e, "Cannot start lesson");
                return;
            }
            self.popup = Some(LessonPopup::Started(id));
            // "recent" order depends on the history we just changed
            self.refresh_results();
        }
    }

    fn submit_form(&mut self) {
        let request = match self.state.page {
            Page::Signup => AuthRequest::Signup {
                name: self.form.name.clone(),
                email: self.form.email.clone(),
                password: self.form.password.clone(),
            },
            _ => AuthRequest::Login {
                email: self.form.email.clone(),
                password: self.form.password.clone(),
            },
        };

        match auth::submit(request, self.clock.now()) {
            Ok(pending) => {
                self.form.error = None;
                self.form.pending = Some(pending);
            }
            Err(e) => self.form.error = Some(e.to_string()),
        }
    }

    pub fn logout(&mut self) {
        self.dispatch(Action::Logout);
        self.chat = ChatSession::new(self.clock.clone());
        self.chat_input.clear();
        self.tutor.reset();
        self.tutor_input.clear();
        self.tutor_focus = TutorFocus::default();
        self.tutor_warning = None;
        self.popup = None;
        self.tag_picker = None;
        self.search_focused = false;
    }

    /// Advance timers: debounced search, pending sign-in, chat and tutor
    /// replies, voice input.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);

        if let Some(term) = self.search_debounce.poll() {
            self.params.search = term;
            self.refresh_results();
        }

        if let Some(pending) = self.form.pending.take() {
            match pending.take_if_ready(self.clock.now()) {
                Ok(user) => {
                    self.form = AuthForm::default();
                    self.dispatch(Action::LoggedIn(user));
                }
                Err(pending) => self.form.pending = Some(pending),
            }
        }

        self.chat.poll();

        let was_generating = self.tutor.is_generating();
        if self.tutor.poll() && was_generating && !self.tutor.is_generating() {
            self.quiz_cursor = 0;
            let count = self.tutor.quiz.as_ref().map_or(0, |q| q.len());
            self.set_status(format!("Generated {} MCQs based on your question!", count));
        }

        if let Some(transcription) = self.mic.poll() {
            self.chat_input = transcription.text;
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        self.tick();
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if !self.state.is_signed_in() {
            match self.state.page {
                Page::Home => self.handle_home_keys(key),
                Page::Login | Page::Signup => self.handle_form_keys(key),
            }
            return;
        }

        match self.state.view {
            View::Dashboard => self.handle_dashboard_keys(key),
            View::Lessons => self.handle_lessons_keys(key),
            View::Practice => self.handle_practice_keys(key),
            View::Tutor => self.handle_tutor_keys(key),
        }
    }

    /// Keys shared by every signed-in screen that is not taking text input.
    fn handle_global_keys(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('t') => self.dispatch(Action::CycleTheme),
            KeyCode::Char('m') => self.dispatch(Action::ToggleSidebar),
            KeyCode::Char('o') => self.logout(),
            KeyCode::Char('1') => self.dispatch(Action::Navigate(View::Dashboard)),
            KeyCode::Char('2') => self.dispatch(Action::Navigate(View::Lessons)),
            KeyCode::Char('3') => self.dispatch(Action::Navigate(View::Practice)),
            KeyCode::Char('4') => self.dispatch(Action::Navigate(View::Tutor)),
            _ => return false,
        }
        true
    }

    fn handle_home_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('t') => self.dispatch(Action::CycleTheme),
            KeyCode::Char('l') | KeyCode::Enter => self.dispatch(Action::ShowPage(Page::Login)),
            KeyCode::Char('s') => self.dispatch(Action::ShowPage(Page::Signup)),
            _ => {}
        }
    }

    fn handle_form_keys(&mut self, key: KeyCode) {
        if self.form.pending.is_some() {
            return;
        }

        let fields = FormField::for_page(self.state.page);
        let focus = self.form.focus.min(fields.len() - 1);

        match key {
            KeyCode::Esc => {
                self.form = AuthForm::default();
                self.dispatch(Action::ShowPage(Page::Home));
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus = (focus + 1) % fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus = (focus + fields.len() - 1) % fields.len();
            }
            KeyCode::Enter => {
                if focus + 1 < fields.len() {
                    self.form.focus = focus + 1;
                } else {
                    self.submit_form();
                }
            }
            KeyCode::Char(c) => {
                self.form.field_mut(fields[focus]).push(c);
            }
            KeyCode::Backspace => {
                self.form.field_mut(fields[focus]).pop();
            }
            _ => {}
        }
    }

    fn handle_dashboard_keys(&mut self, key: KeyCode) {
        self.handle_global_keys(key);
    }

    fn handle_lessons_keys(&mut self, key: KeyCode) {
        if self.popup.is_some() {
            if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.popup = None;
            }
            return;
        }

        if self.tag_picker.is_some() {
            self.handle_tag_picker_keys(key);
            return;
        }

        if self.search_focused {
            match key {
                KeyCode::Esc | KeyCode::Enter => self.search_focused = false,
                KeyCode::Char(c) => {
                    self.search_input.push(c);
                    self.update_search();
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                    self.update_search();
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('/') => self.search_focused = true,
            KeyCode::Char('l') => {
                self.params.level = Level::cycle(self.params.level);
                self.refresh_results();
            }
            KeyCode::Char('y') => {
                self.params.kind = LessonType::cycle(self.params.kind);
                self.refresh_results();
            }
            KeyCode::Char('s') => {
                self.params.sort = self.params.sort.next();
                self.refresh_results();
            }
            KeyCode::Char('g') => {
                self.tag_picker = Some(ListState::default().with_selected(Some(0)));
            }
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Char('f') => self.toggle_favorite_selected(),
            KeyCode::Char('b') => self.toggle_bookmark_selected(),
            KeyCode::Char('p') => {
                if let Some(id) = self.selected_lesson_id() {
                    self.popup = Some(LessonPopup::Preview(id));
                }
            }
            KeyCode::Enter => self.start_selected_lesson(),
            KeyCode::Up | KeyCode::Char('k') => {
                if !self.results.is_empty() {
                    let i = self.lesson_list_state.selected().unwrap_or(0);
                    let new_i = if i == 0 { self.results.len() - 1 } else { i - 1 };
                    self.lesson_list_state.select(Some(new_i));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if !self.results.is_empty() {
                    let i = self.lesson_list_state.selected().unwrap_or(0);
                    let new_i = if i >= self.results.len() - 1 { 0 } else { i + 1 };
                    self.lesson_list_state.select(Some(new_i));
                }
            }
            other => {
                self.handle_global_keys(other);
            }
        }
    }

    fn handle_tag_picker_keys(&mut self, key: KeyCode) {
        let tag_count = self.catalog.all_tags().len();
        let Some(picker) = self.tag_picker.as_mut() else {
            return;
        };

        match key {
            KeyCode::Esc | KeyCode::Char('g') | KeyCode::Char('q') => self.tag_picker = None,
            KeyCode::Up | KeyCode::Char('k') if tag_count > 0 => {
                let i = picker.selected().unwrap_or(0);
                picker.select(Some(if i == 0 { tag_count - 1 } else { i - 1 }));
            }
            KeyCode::Down | KeyCode::Char('j') if tag_count > 0 => {
                let i = picker.selected().unwrap_or(0);
                picker.select(Some(if i + 1 >= tag_count { 0 } else { i + 1 }));
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let selected = picker.selected().unwrap_or(0);
                let tag = self.catalog.all_tags().get(selected).map(|t| t.to_string());
                if let Some(tag) = tag {
                    self.params.toggle_tag(&tag);
                    self.refresh_results();
                }
            }
            _ => {}
        }
    }

    fn handle_practice_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.dispatch(Action::Navigate(View::Dashboard)),
            KeyCode::Tab => self.mic.toggle(),
            KeyCode::Enter => {
                if self.chat.send(&self.chat_input) {
                    self.chat_input.clear();
                }
            }
            KeyCode::Char(c) => self.chat_input.push(c),
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            _ => {}
        }
    }

    fn handle_tutor_keys(&mut self, key: KeyCode) {
        match self.tutor_focus {
            TutorFocus::Ask => match key {
                KeyCode::Esc => self.dispatch(Action::Navigate(View::Dashboard)),
                KeyCode::Tab => self.tutor_focus = TutorFocus::Quiz,
                KeyCode::Left => self.tutor.prev_topic(),
                KeyCode::Right => self.tutor.next_topic(),
                KeyCode::Up => self.tutor.more_questions(),
                KeyCode::Down => self.tutor.fewer_questions(),
                KeyCode::Enter => {
                    self.tutor_warning = self.tutor.ask(&self.tutor_input).err().map(|e| e.to_string());
                }
                KeyCode::Char(c) => self.tutor_input.push(c),
                KeyCode::Backspace => {
                    self.tutor_input.pop();
                }
                _ => {}
            },
            TutorFocus::Quiz => {
                let len = self.tutor.quiz.as_ref().map_or(0, |q| q.len());
                match key {
                    KeyCode::Esc | KeyCode::Tab => self.tutor_focus = TutorFocus::Ask,
                    KeyCode::Char('g') => {
                        self.tutor_warning = self.tutor.generate(&self.tutor_input).err().map(|e| e.to_string());
                    }
                    KeyCode::Up | KeyCode::Char('k') if len > 0 => {
                        self.quiz_cursor = if self.quiz_cursor == 0 { len - 1 } else { self.quiz_cursor - 1 };
                    }
                    KeyCode::Down | KeyCode::Char('j') if len > 0 => {
                        self.quiz_cursor = if self.quiz_cursor + 1 >= len { 0 } else { self.quiz_cursor + 1 };
                    }
                    KeyCode::Char(c @ 'a'..='d') => {
                        let option = (c as u8 - b'a') as usize;
                        if let Some(quiz) = self.tutor.quiz.as_mut() {
                            quiz.select(self.quiz_cursor, option);
                        }
                    }
                    KeyCode::Char('s') | KeyCode::Enter => {
                        if let Some(quiz) = self.tutor.quiz.as_mut() {
                            if !quiz.is_submitted() {
                                quiz.submit();
                                let score = quiz.score();
                                debug!(correct = score.correct, total = score.total, "Quiz submitted");
                                self.set_status(score.to_string());
                            }
                        }
                    }
                    other => {
                        self.handle_global_keys(other);
                    }
                }
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Clear with background
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.colors.bg_dark)),
            area,
        );

        if !self.state.is_signed_in() {
            match self.state.page {
                Page::Home => self.render_home(frame, area),
                Page::Login | Page::Signup => self.render_form(frame, area),
            }
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(1),   // Navbar
            Constraint::Min(10),     // Body
            Constraint::Length(1),   // Status
            Constraint::Length(1),   // Hints
        ])
        .split(area);

        self.render_navbar(frame, chunks[0]);

        let body = if self.state.sidebar_open {
            let split = Layout::horizontal([Constraint::Length(18), Constraint::Min(20)]).split(chunks[1]);
            self.render_sidebar(frame, split[0]);
            split[1]
        } else {
            chunks[1]
        };

        match self.state.view {
            View::Dashboard => self.render_dashboard(frame, body),
            View::Lessons => self.render_lessons(frame, body),
            View::Practice => self.render_practice(frame, body),
            View::Tutor => self.render_tutor(frame, body),
        }

        // Show status message if recent (within 3 seconds)
        if let Some((ref msg, time)) = self.status_message {
            if self.clock.now().duration_since(time) < Duration::from_secs(3) {
                let status = Paragraph::new(msg.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(self.theme.colors.success));
                frame.render_widget(status, chunks[2]);
            }
        }

        self.render_hints(frame, chunks[3]);
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Top padding
            Constraint::Length(8),   // Logo
            Constraint::Length(2),   // Tagline
            Constraint::Min(6),      // Features
            Constraint::Length(4),   // Plans
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        frame.render_widget(Logo::new(&self.theme), chunks[1]);

        let tagline = Paragraph::new("Master a new language with AI-powered practice")
            .alignment(Alignment::Center)
            .style(self.theme.subtitle());
        frame.render_widget(tagline, chunks[2]);

        const FEATURES: [(&str, &str); 4] = [
            ("Real-time Voice Recognition", "Practice pronunciation with instant feedback and accuracy scoring."),
            ("AI Conversation Partner", "Engage in natural conversations with our AI language partner."),
            ("Personalized Learning", "Adaptive lessons tailored to your skill level and goals."),
            ("Progress Tracking", "Monitor your improvement with detailed analytics and insights."),
        ];

        let feature_lines: Vec<Line> = FEATURES
            .iter()
            .flat_map(|(title, description)| {
                [
                    Line::from(vec![
                        Span::styled(format!("{} ", icons::CHECK), Style::default().fg(self.theme.colors.success)),
                        Span::styled(*title, self.theme.highlight()),
                    ]),
                    Line::from(Span::styled(format!("  {}", description), self.theme.subtitle())),
                ]
            })
            .collect();
        let features = Paragraph::new(feature_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.primary))
                .title(" Why Lingo ")
                .title_style(self.theme.highlight()),
        );
        frame.render_widget(features, centered_rect(70, 100, chunks[3]));

        let plans = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("Free ", self.theme.title()),
                Span::styled("$0  ", self.theme.subtitle()),
                Span::styled("│ ", self.theme.key_hint()),
                Span::styled("Pro ", self.theme.title()),
                Span::styled("$9.99/mo  ", self.theme.subtitle()),
                Span::styled("│ ", self.theme.key_hint()),
                Span::styled("Enterprise ", self.theme.title()),
                Span::styled("Contact us", self.theme.subtitle()),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(plans, chunks[4]);

        let theme_hint = format!("[{}]", self.theme.name.display_name());
        let hints = [("l", "login"), ("s", "sign up"), ("t", theme_hint.as_str()), ("q", "quit")];
        frame.render_widget(KeyHints::new(&hints, &self.theme), chunks[5]);
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) {
        let fields = FormField::for_page(self.state.page);
        let focus = self.form.focus.min(fields.len() - 1);

        let mut constraints = vec![
            Constraint::Length(3),   // Title
            Constraint::Length(1),   // Error
        ];
        constraints.extend(fields.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(1));   // Spacing
        constraints.push(Constraint::Length(1));   // Submit state
        constraints.push(Constraint::Min(1));      // Spacer
        constraints.push(Constraint::Length(2));   // Hints

        let chunks = Layout::vertical(constraints).split(centered_rect(50, 100, area));

        let (title, action) = match self.state.page {
            Page::Signup => ("Create Account", "Sign Up"),
            _ => ("Welcome Back", "Login"),
        };
        frame.render_widget(
            Paragraph::new(title)
                .alignment(Alignment::Center)
                .style(self.theme.title()),
            chunks[0],
        );

        if let Some(ref error) = self.form.error {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(self.theme.colors.error)),
                chunks[1],
            );
        }

        for (i, field) in fields.iter().enumerate() {
            let style = self.theme.input(i == focus);
            let value = self.form.field(*field);
            let shown = match field {
                FormField::Password => "•".repeat(value.chars().count()),
                _ => value.to_string(),
            };
            let input = Paragraph::new(shown.clone()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(style)
                    .title(field.label())
                    .title_style(style),
            );
            let field_area = chunks[2 + i];
            frame.render_widget(input, field_area);

            if i == focus && self.form.pending.is_none() {
                let x = field_area.x + 1 + shown.chars().count() as u16;
                frame.set_cursor_position((x.min(field_area.right().saturating_sub(2)), field_area.y + 1));
            }
        }

        let submit_state = if self.form.pending.is_some() {
            let verb = if self.state.page == Page::Signup { "Creating account" } else { "Logging in" };
            format!("{} {}...", self.spinner(), verb)
        } else {
            format!("[ {} ]", action)
        };
        frame.render_widget(
            Paragraph::new(submit_state)
                .alignment(Alignment::Center)
                .style(self.theme.highlight()),
            chunks[3 + fields.len()],
        );

        let hints = [("Tab", "next field"), ("Enter", "submit"), ("Esc", "back")];
        frame.render_widget(KeyHints::new(&hints, &self.theme), chunks[chunks.len() - 1]);
    }

    fn render_navbar(&self, frame: &mut Frame, area: Rect) {
        let user = self
            .state
            .user
            .as_ref()
            .map(|u| format!("{} <{}>", u.name, u.email))
            .unwrap_or_default();

        let line = Line::from(vec![
            Span::styled(format!(" {} Lingo ", icons::BOOK), self.theme.highlight()),
            Span::styled(format!("  {}", self.state.view.label()), self.theme.subtitle()),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        let right = Line::from(vec![
            Span::styled(format!("[{}] ", self.theme.name.display_name()), self.theme.key_hint()),
            Span::styled(user, self.theme.subtitle()),
            Span::raw(" "),
        ]);
        frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
    }

    fn render_sidebar(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = View::ALL
            .iter()
            .enumerate()
            .map(|(i, view)| {
                let style = if *view == self.state.view {
                    self.theme.selected().add_modifier(Modifier::BOLD)
                } else {
                    self.theme.subtitle()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", i + 1), self.theme.key_highlight()),
                    Span::styled(view.label(), style),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.text_dim)),
        );
        frame.render_widget(list, area);
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let theme_hint = format!("[{}]", self.theme.name.display_name());
        let hints: Vec<(&str, &str)> = match self.state.view {
            View::Dashboard => vec![
                ("1-4", "navigate"),
                ("m", "menu"),
                ("t", theme_hint.as_str()),
                ("o", "logout"),
                ("q", "quit"),
            ],
            View::Lessons if self.popup.is_some() => vec![("Esc", "close")],
            View::Lessons if self.tag_picker.is_some() => {
                vec![("j/k", "nav"), ("Space", "toggle tag"), ("Esc", "close")]
            }
            View::Lessons if self.search_focused => vec![("type", "search"), ("Enter/Esc", "done")],
            View::Lessons => vec![
                ("/", "search"),
                ("l", "level"),
                ("y", "type"),
                ("s", "sort"),
                ("g", "tags"),
                ("c", "clear"),
                ("f", "fav"),
                ("b", "bookmark"),
                ("p", "preview"),
                ("Enter", "start"),
                ("q", "quit"),
            ],
            View::Practice => vec![("Enter", "send"), ("Tab", "microphone"), ("Esc", "back")],
            View::Tutor => match self.tutor_focus {
                TutorFocus::Ask => vec![
                    ("Enter", "ask"),
                    ("←/→", "topic"),
                    ("↑/↓", "questions"),
                    ("Tab", "quiz"),
                    ("Esc", "back"),
                ],
                TutorFocus::Quiz => vec![
                    ("g", "generate"),
                    ("j/k", "question"),
                    ("a-d", "answer"),
                    ("s", "submit"),
                    ("Tab", "ask"),
                ],
            },
        };
        frame.render_widget(KeyHints::new(&hints, &self.theme), area);
    }

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Title
            Constraint::Length(3),   // Score gauges
            Constraint::Length(1),   // Spacing
            Constraint::Min(8),      // Topics and levels
            Constraint::Length(3),   // Total score and streak
        ])
        .split(area);

        let name = self.state.user.as_ref().map(|u| u.name.as_str()).unwrap_or("learner");
        frame.render_widget(
            Paragraph::new(format!("Welcome back, {}!", name))
                .alignment(Alignment::Center)
                .style(self.theme.title()),
            chunks[0],
        );

        frame.render_widget(ScoreGauges::new(&self.progress, &self.theme), chunks[1]);

        let columns = Layout::horizontal([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(chunks[3]);

        let topic_lines: Vec<Line> = self
            .progress
            .topics
            .iter()
            .map(|topic| {
                let (icon, color) = if topic.completed {
                    (icons::CHECK, self.theme.colors.success)
                } else {
                    (icons::CIRCLE, self.theme.colors.text_dim)
                };
                Line::from(vec![
                    Span::styled(format!(" {} ", icon), Style::default().fg(color)),
                    Span::styled(topic.name, Style::default().fg(self.theme.colors.text)),
                ])
            })
            .collect();
        let topics = Paragraph::new(topic_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.primary))
                .title(format!(
                    " Topics {}/{} ",
                    self.progress.topics_completed(),
                    self.progress.topics.len()
                ))
                .title_style(self.theme.highlight()),
        );
        frame.render_widget(topics, columns[0]);

        let level_lines: Vec<Line> = self
            .progress
            .levels
            .iter()
            .map(|(level, status)| {
                let color = match status {
                    LevelStatus::Completed => self.theme.colors.success,
                    LevelStatus::InProgress => self.theme.colors.warning,
                    LevelStatus::Locked => self.theme.colors.text_dim,
                };
                Line::from(vec![
                    Span::styled(format!(" {:<14}", level.label()), Style::default().fg(self.theme.colors.text)),
                    Span::styled(status.label(), Style::default().fg(color)),
                ])
            })
            .collect();
        let levels = Paragraph::new(level_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.accent))
                .title(" Level Progress ")
                .title_style(Style::default().fg(self.theme.colors.accent)),
        );
        frame.render_widget(levels, columns[1]);

        let recent = self.catalog.recent_lessons();
        let recent_lines: Vec<Line> = if recent.is_empty() {
            vec![Line::from(Span::styled(" Start a lesson to see it here", self.theme.subtitle()))]
        } else {
            let width = (columns[2].width as usize).saturating_sub(6);
            recent
                .iter()
                .map(|lesson| {
                    Line::from(vec![
                        Span::styled(format!(" {} ", icons::BOOK), self.theme.subtitle()),
                        Span::styled(truncate(&lesson.title, width), Style::default().fg(self.theme.colors.text)),
                    ])
                })
                .collect()
        };
        let recent_block = Paragraph::new(recent_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.colors.secondary))
                .title(" Recently Viewed ")
                .title_style(Style::default().fg(self.theme.colors.secondary)),
        );
        frame.render_widget(recent_block, columns[2]);

        let summary = Line::from(vec![
            Span::styled("Total Score: ", self.theme.subtitle()),
            Span::styled(
                format!("{}%", self.progress.total_score()),
                self.theme.highlight(),
            ),
            Span::styled("    ", self.theme.subtitle()),
            Span::styled(format!("{} Streak: ", icons::FIRE), self.theme.subtitle()),
            Span::styled(
                format!("{} days", self.progress.streak_days),
                Style::default().fg(self.theme.colors.warning).add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(summary).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.text_dim)),
            ),
            chunks[4],
        );
    }

    fn render_lessons(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Search box
            Constraint::Length(1),   // Filters
            Constraint::Length(1),   // Spacing
            Constraint::Min(8),      // List and details
        ])
        .split(area);

        // Search box
        let search_style = self.theme.input(self.search_focused);
        let mut search_title = vec![Span::styled(" Search lessons ", search_style)];
        if self.is_searching() {
            search_title.push(Span::styled(
                format!("{} ", self.spinner()),
                Style::default().fg(self.theme.colors.warning),
            ));
        }
        let search = Paragraph::new(self.search_input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Line::from(search_title)),
        );
        frame.render_widget(search, chunks[0]);
        if self.search_focused {
            let x = chunks[0].x + 1 + self.search_input.chars().count() as u16;
            frame.set_cursor_position((x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
        }

        // Filters
        let level = self.params.level.map_or("All Levels", |l| l.label());
        let kind = self.params.kind.map_or("All Types", |k| k.label());
        let tags = if self.params.tags.is_empty() {
            "any".to_string()
        } else {
            self.params.tags.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        let filters = Line::from(vec![
            Span::styled("Level: ", self.theme.key_hint()),
            Span::styled(level, self.theme.subtitle()),
            Span::styled("  Type: ", self.theme.key_hint()),
            Span::styled(kind, self.theme.subtitle()),
            Span::styled("  Sort: ", self.theme.key_hint()),
            Span::styled(self.params.sort.label(), self.theme.subtitle()),
            Span::styled("  Tags: ", self.theme.key_hint()),
            Span::styled(tags, self.theme.subtitle()),
        ]);
        frame.render_widget(Paragraph::new(filters), chunks[1]);

        if self.results.is_empty() {
            frame.render_widget(
                EmptyState::new(
                    "No lessons found",
                    "Try adjusting your filters or search term",
                    &self.theme,
                ),
                chunks[3],
            );
        } else {
            let main_chunks = Layout::horizontal([
                Constraint::Percentage(40),  // Lesson list
                Constraint::Percentage(60),  // Lesson details
            ])
            .split(chunks[3]);

            let title_width = (main_chunks[0].width as usize).saturating_sub(10);
            let interaction = self.catalog.interaction();
            let items: Vec<ListItem> = self
                .results
                .iter()
                .filter_map(|&id| self.catalog.lesson(id))
                .map(|lesson| {
                    let mut spans = vec![Span::styled(
                        truncate(&lesson.title, title_width),
                        Style::default().fg(self.theme.colors.text),
                    )];
                    if interaction.is_favorite(lesson.id) {
                        spans.push(Span::styled(format!(" {}", icons::HEART), self.theme.favorite()));
                    }
                    if interaction.is_bookmarked(lesson.id) {
                        spans.push(Span::styled(format!(" {}", icons::BOOKMARK), self.theme.bookmark()));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();

            let list = List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(self.theme.colors.primary))
                        .title(if self.params.is_filtered() {
                            format!(" Lessons ({} of {}) ", self.results.len(), self.catalog.lessons().len())
                        } else {
                            format!(" Lessons ({}) ", self.results.len())
                        })
                        .title_style(self.theme.highlight()),
                )
                .highlight_style(self.theme.selected())
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, main_chunks[0], &mut self.lesson_list_state);

            if let Some(lesson) = self.selected_lesson_id().and_then(|id| self.catalog.lesson(id)) {
                let interaction = self.catalog.interaction();
                frame.render_widget(
                    LessonCard::new(
                        lesson,
                        interaction.is_favorite(lesson.id),
                        interaction.is_bookmarked(lesson.id),
                        &self.theme,
                    ),
                    main_chunks[1],
                );
            }
        }

        if self.tag_picker.is_some() {
            self.render_tag_picker(frame, area);
        }
        if let Some(popup) = self.popup {
            self.render_lesson_popup(frame, area, popup);
        }
    }

    fn render_tag_picker(&mut self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(40, 70, area);
        let items: Vec<ListItem> = self
            .catalog
            .all_tags()
            .into_iter()
            .map(|tag| {
                let (mark, style) = if self.params.tags.contains(tag) {
                    ("[x] ", self.theme.highlight())
                } else {
                    ("[ ] ", self.theme.subtitle())
                };
                ListItem::new(Line::from(vec![Span::styled(mark, style), Span::styled(tag.to_string(), style)]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.accent))
                    .title(" Select Tags ")
                    .title_style(self.theme.key_highlight())
                    .style(Style::default().bg(self.theme.colors.bg_card)),
            )
            .highlight_style(self.theme.selected());

        frame.render_widget(Clear, popup_area);
        if let Some(state) = self.tag_picker.as_mut() {
            frame.render_stateful_widget(list, popup_area, state);
        }
    }

    fn render_lesson_popup(&self, frame: &mut Frame, area: Rect, popup: LessonPopup) {
        let (id, heading) = match popup {
            LessonPopup::Preview(id) => (id, "Preview"),
            LessonPopup::Started(id) => (id, "Lesson"),
        };
        let Some(lesson) = self.catalog.lesson(id) else {
            return;
        };

        let mut text = vec![
            Line::from(Span::styled(lesson.title.as_str(), self.theme.title())),
            Line::from(""),
            Line::from(Span::styled(lesson.description.as_str(), self.theme.subtitle())),
        ];
        if let LessonPopup::Started(_) = popup {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                format!("{} {} · {} · {}", icons::CLOCK, lesson.duration, lesson.level, lesson.kind.label()),
                self.theme.key_hint(),
            )));
        }

        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);
        frame.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.accent))
                    .title(format!(" {} ", heading))
                    .title_style(self.theme.key_highlight())
                    .style(Style::default().bg(self.theme.colors.bg_card)),
            ),
            popup_area,
        );
    }

    fn render_practice(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(area);
        let chat_chunks = Layout::vertical([Constraint::Min(5), Constraint::Length(3)]).split(columns[0]);

        frame.render_widget(
            ChatTranscript::new(&self.chat.messages, self.chat.is_processing(), &self.theme),
            chat_chunks[0],
        );

        let input_style = self.theme.input(!self.chat.is_processing());
        let input = Paragraph::new(self.chat_input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(input_style)
                .title(" Type your message... ")
                .title_style(input_style),
        );
        frame.render_widget(input, chat_chunks[1]);
        let x = chat_chunks[1].x + 1 + self.chat_input.chars().count() as u16;
        frame.set_cursor_position((x.min(chat_chunks[1].right().saturating_sub(2)), chat_chunks[1].y + 1));

        let mut mic_lines = vec![Line::from("")];
        if self.mic.is_recording() {
            mic_lines.push(Line::from(Span::styled(
                format!("{} Recording... Speak clearly", icons::MIC),
                Style::default().fg(self.theme.colors.error).add_modifier(Modifier::BOLD),
            )));
        } else if self.mic.is_processing() {
            mic_lines.push(Line::from(Span::styled(
                format!("{} Processing...", self.spinner()),
                Style::default().fg(self.theme.colors.warning),
            )));
        } else {
            mic_lines.push(Line::from(Span::styled(
                format!("{} Press Tab to speak", icons::MIC),
                self.theme.subtitle(),
            )));
        }

        if let Some(ref transcription) = self.mic.last {
            mic_lines.push(Line::from(""));
            mic_lines.push(Line::from(Span::styled(transcription.text.as_str(), self.theme.title())));
            mic_lines.push(Line::from(vec![
                Span::styled("Confidence ", self.theme.subtitle()),
                Span::styled(format!("{}%", transcription.confidence), self.theme.highlight()),
            ]));
        }

        frame.render_widget(
            Paragraph::new(mic_lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(self.theme.colors.secondary))
                        .title(" Voice Input ")
                        .title_style(Style::default().fg(self.theme.colors.secondary)),
                ),
            columns[1],
        );
    }

    fn render_tutor(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(area);
        let left = Layout::vertical([
            Constraint::Length(3),   // Topic
            Constraint::Length(3),   // Question input
            Constraint::Length(1),   // Question count
            Constraint::Length(1),   // Warning
            Constraint::Min(4),      // Tutor reply
        ])
        .split(columns[0]);

        let asking = self.tutor_focus == TutorFocus::Ask;
        let topic = Paragraph::new(format!("◀ {} ▶", self.tutor.topic()))
            .alignment(Alignment::Center)
            .style(self.theme.highlight())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.primary))
                    .title(" Topic ")
                    .title_style(self.theme.highlight()),
            );
        frame.render_widget(topic, left[0]);

        let input_style = self.theme.input(asking);
        let input = Paragraph::new(self.tutor_input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(input_style)
                .title(" Ask a question ")
                .title_style(input_style),
        );
        frame.render_widget(input, left[1]);
        if asking {
            let x = left[1].x + 1 + self.tutor_input.chars().count() as u16;
            frame.set_cursor_position((x.min(left[1].right().saturating_sub(2)), left[1].y + 1));
        }

        let count = Line::from(vec![
            Span::styled(" Questions: ", self.theme.key_hint()),
            Span::styled(format!("{}/{}", self.tutor.count(), MAX_QUESTIONS), self.theme.subtitle()),
        ]);
        frame.render_widget(Paragraph::new(count), left[2]);

        if let Some(ref warning) = self.tutor_warning {
            frame.render_widget(
                Paragraph::new(format!(" {}", warning)).style(Style::default().fg(self.theme.colors.warning)),
                left[3],
            );
        }

        let reply = if self.tutor.is_thinking() {
            Line::from(Span::styled(
                format!("{} Thinking...", self.spinner()),
                Style::default().fg(self.theme.colors.warning),
            ))
        } else if let Some(ref reply) = self.tutor.reply {
            Line::from(Span::styled(reply.as_str(), Style::default().fg(self.theme.colors.text)))
        } else {
            Line::from(Span::styled(
                "Select a topic, ask a question, and generate MCQs based on it!",
                self.theme.subtitle(),
            ))
        };
        frame.render_widget(
            Paragraph::new(reply).wrap(Wrap { trim: true }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.secondary))
                    .title(" Tutor ")
                    .title_style(Style::default().fg(self.theme.colors.secondary)),
            ),
            left[4],
        );

        self.render_quiz(frame, columns[1]);
    }

    fn render_quiz(&self, frame: &mut Frame, area: Rect) {
        let border = self.theme.input(self.tutor_focus == TutorFocus::Quiz);
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(" Quiz ")
            .title_style(border);

        let width = (area.width as usize).saturating_sub(4);
        let mut lines: Vec<Line> = Vec::new();
        let mut cursor_line = 0;

        match self.tutor.quiz {
            _ if self.tutor.is_generating() => {
                lines.push(Line::from(Span::styled(
                    format!("{} Generating MCQs...", self.spinner()),
                    Style::default().fg(self.theme.colors.warning),
                )));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "Ask a question, then press Tab and g to generate MCQs",
                    self.theme.subtitle(),
                )));
            }
            Some(ref quiz) => {
                if quiz.is_submitted() {
                    block = block.title_bottom(Line::from(Span::styled(
                        format!(" {} ", quiz.score()),
                        self.theme.highlight(),
                    )));
                }

                for (i, mcq) in quiz.questions().iter().enumerate() {
                    if i == self.quiz_cursor {
                        cursor_line = lines.len();
                    }
                    let (marker, style) = if i == self.quiz_cursor {
                        ("> ", self.theme.selected())
                    } else {
                        ("  ", self.theme.title())
                    };
                    let heading = format!("Q{}: {}", i + 1, mcq.question);
                    lines.push(Line::from(Span::styled(
                        format!("{}{}", marker, truncate(&heading, width.saturating_sub(2))),
                        style,
                    )));

                    if quiz.is_submitted() {
                        let feedback = &quiz.feedback()[i];
                        lines.push(Line::from(vec![
                            Span::styled("    Your Answer: ", self.theme.key_hint()),
                            Span::styled(feedback.answer.unwrap_or("(none)").to_string(), self.theme.subtitle()),
                        ]));
                        lines.push(Line::from(vec![
                            Span::styled("    Correct Answer: ", self.theme.key_hint()),
                            Span::styled(mcq.correct_option.clone(), self.theme.subtitle()),
                        ]));
                        lines.push(if feedback.correct {
                            Line::from(Span::styled(
                                format!("    {} Correct!", icons::CHECK),
                                Style::default().fg(self.theme.colors.success),
                            ))
                        } else {
                            Line::from(Span::styled(
                                "    ✗ Incorrect.",
                                Style::default().fg(self.theme.colors.error),
                            ))
                        });
                    } else {
                        for (j, option) in mcq.options.iter().enumerate() {
                            let chosen = quiz.selected(i) == Some(j);
                            let letter = (b'a' + j as u8) as char;
                            let text = format!(
                                "    {} {}. {}",
                                if chosen { "(•)" } else { "( )" },
                                letter,
                                option
                            );
                            let style = if chosen {
                                self.theme.highlight()
                            } else {
                                Style::default().fg(self.theme.colors.text)
                            };
                            lines.push(Line::from(Span::styled(truncate(&text, width), style)));
                        }
                    }
                    lines.push(Line::from(""));
                }

                if quiz.is_submitted() {
                    lines.push(Line::from(Span::styled(quiz.score().to_string(), self.theme.highlight())));
                } else {
                    lines.push(Line::from(Span::styled(
                        format!("Answered {}/{}", quiz.answered(), quiz.len()),
                        self.theme.subtitle(),
                    )));
                }
            }
        }

        // Keep the selected question in view
        let height = area.height.saturating_sub(2) as usize;
        let scroll = if lines.len() <= height {
            0
        } else {
            cursor_line.saturating_sub(1).min(lines.len() - height)
        };

        frame.render_widget(
            Paragraph::new(lines).block(block).scroll((scroll as u16, 0)),
            area,
        );
    }

    fn spinner(&self) -> &'static str {
        icons::SPINNER[self.spinner_frame % icons::SPINNER.len()]
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
