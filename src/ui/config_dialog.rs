use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use iced::widget::{button, column, container, row, slider, text, text_input};
use iced::{application, window, Element, Length, Task, Theme};

use crate::layout::LayoutConfig;

#[derive(Debug, Clone)]
pub struct DialogResult {
    /// Manifest to load; `None` keeps the current cards
    pub manifest_path: Option<PathBuf>,
    pub layout: LayoutConfig,
}

/// Run the settings window to completion. Returns `None` when the user
/// cancels or the window fails to open.
pub fn run_config_dialog(title: &str, initial: DialogResult) -> Option<DialogResult> {
    let output = Arc::new(Mutex::new(None));
    let output_for_app = output.clone();
    let initial_for_app = initial.clone();
    let title_owned = title.to_string();

    let run = application(
        move |_state: &ConfigDialog| title_owned.clone(),
        move |state: &mut ConfigDialog, message: Message| state.update(message),
        view,
    )
    .theme(|_| Theme::Dark)
    .window_size((720.0, 620.0))
    .run_with(move || (ConfigDialog::new(initial_for_app, output_for_app), Task::none()));

    if let Err(e) = run {
        tracing::error!("Settings dialog failed: {}", e);
        return None;
    }
    output.lock().ok().and_then(|g| g.clone())
}

#[derive(Debug, Clone)]
enum Message {
    PathChanged(String),
    BrowsePath,
    GapChanged(f32),
    MinColChanged(f32),
    MaxColChanged(f32),
    MinColsChanged(f32),
    MaxColsChanged(f32),
    ExpandFactorChanged(f32),
    OrderSeedChanged(String),
    SpanSeedChanged(String),
    ResetDefaults,
    Apply,
    Cancel,
}

struct ConfigDialog {
    path_text: String,
    gap: f32,
    min_col: f32,
    max_col: f32,
    min_cols: f32,
    max_cols: f32,
    expand_factor: f32,
    order_seed: String,
    span_seed: String,
    /// Fields not exposed as widgets are carried through unchanged
    base: LayoutConfig,
    output: Arc<Mutex<Option<DialogResult>>>,
}

impl ConfigDialog {
    fn new(initial: DialogResult, output: Arc<Mutex<Option<DialogResult>>>) -> Self {
        let mut dialog = Self {
            path_text: initial
                .manifest_path
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            gap: 0.0,
            min_col: 0.0,
            max_col: 0.0,
            min_cols: 0.0,
            max_cols: 0.0,
            expand_factor: 0.0,
            order_seed: String::new(),
            span_seed: String::new(),
            base: initial.layout.clone(),
            output,
        };
        dialog.load(&initial.layout);
        dialog
    }

    fn load(&mut self, layout: &LayoutConfig) {
        self.gap = layout.gap as f32;
        self.min_col = layout.min_col_width as f32;
        self.max_col = layout.max_col_width as f32;
        self.min_cols = layout.min_cols as f32;
        self.max_cols = layout.max_cols as f32;
        self.expand_factor = layout.default_expand_factor;
        self.order_seed = layout.order_seed.to_string();
        self.span_seed = layout.span_seed.to_string();
    }

    /// Widget values folded back into a config. Unparseable seeds keep
    /// their previous value.
    fn layout(&self) -> LayoutConfig {
        let min_cols = self.min_cols.round() as usize;
        LayoutConfig {
            gap: self.gap.round() as i32,
            min_col_width: self.min_col.round() as i32,
            max_col_width: self.max_col.round() as i32,
            min_cols,
            max_cols: (self.max_cols.round() as usize).max(min_cols),
            order_seed: self.order_seed.trim().parse().unwrap_or(self.base.order_seed),
            span_seed: self.span_seed.trim().parse().unwrap_or(self.base.span_seed),
            default_expand_factor: self.expand_factor,
            ..self.base.clone()
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PathChanged(value) => {
                self.path_text = value;
                Task::none()
            }
            Message::BrowsePath => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Gallery manifest", &["json"])
                    .pick_file()
                {
                    self.path_text = path.to_string_lossy().to_string();
                }
                Task::none()
            }
            Message::GapChanged(v) => {
                self.gap = v;
                Task::none()
            }
            Message::MinColChanged(v) => {
                self.min_col = v;
                Task::none()
            }
            Message::MaxColChanged(v) => {
                self.max_col = v;
                Task::none()
            }
            Message::MinColsChanged(v) => {
                self.min_cols = v;
                Task::none()
            }
            Message::MaxColsChanged(v) => {
                self.max_cols = v;
                Task::none()
            }
            Message::ExpandFactorChanged(v) => {
                self.expand_factor = v;
                Task::none()
            }
            Message::OrderSeedChanged(v) => {
                self.order_seed = v;
                Task::none()
            }
            Message::SpanSeedChanged(v) => {
                self.span_seed = v;
                Task::none()
            }
            Message::ResetDefaults => {
                self.load(&LayoutConfig::default());
                Task::none()
            }
            Message::Apply => {
                let trimmed = self.path_text.trim();
                let manifest_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));

                if let Ok(mut guard) = self.output.lock() {
                    *guard = Some(DialogResult {
                        manifest_path,
                        layout: self.layout(),
                    });
                }

                window::get_latest().then(|id| match id {
                    Some(id) => window::close::<Message>(id),
                    None => Task::none(),
                })
            }
            Message::Cancel => window::get_latest().then(|id| match id {
                Some(id) => window::close::<Message>(id),
                None => Task::none(),
            }),
        }
    }
}

fn setting_slider<'a>(
    label: &'a str,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
    step: f32,
    on_change: impl Fn(f32) -> Message + 'a,
) -> Element<'a, Message> {
    let shown = if step < 1.0 {
        format!("{label}: {value:.2}")
    } else {
        format!("{label}: {value:.0}")
    };
    column![text(shown).size(16), slider(range, value, on_change).step(step)]
        .spacing(6)
        .into()
}

fn view(state: &ConfigDialog) -> Element<'_, Message> {
    let mut body = column![text("Gallery Settings").size(26)].spacing(14);

    body = body.push(
        column![
            text("Manifest").size(18),
            row![
                text_input("gallery.json (empty keeps the current cards)", &state.path_text)
                    .on_input(Message::PathChanged)
                    .padding(8)
                    .width(Length::Fill),
                button("Browse").on_press(Message::BrowsePath)
            ]
            .spacing(8)
        ]
        .spacing(8),
    );

    let settings = column![
        text("Columns").size(18),
        setting_slider("Gap (px)", state.gap, 0.0..=48.0, 1.0, Message::GapChanged),
        setting_slider("Min Column Width (px)", state.min_col, 80.0..=480.0, 1.0, Message::MinColChanged),
        setting_slider("Max Column Width (px)", state.max_col, 80.0..=640.0, 1.0, Message::MaxColChanged),
        setting_slider("Min Columns", state.min_cols, 1.0..=6.0, 1.0, Message::MinColsChanged),
        setting_slider("Max Columns", state.max_cols, 1.0..=12.0, 1.0, Message::MaxColsChanged),
        text("Cards").size(18),
        setting_slider(
            "Expand Factor",
            state.expand_factor,
            1.0..=3.0,
            0.05,
            Message::ExpandFactorChanged
        ),
        row![
            column![
                text("Order Seed").size(16),
                text_input("2025", &state.order_seed)
                    .on_input(Message::OrderSeedChanged)
                    .padding(8)
            ]
            .spacing(6)
            .width(Length::Fill),
            column![
                text("Span Seed").size(16),
                text_input("1000", &state.span_seed)
                    .on_input(Message::SpanSeedChanged)
                    .padding(8)
            ]
            .spacing(6)
            .width(Length::Fill),
        ]
        .spacing(12)
    ]
    .spacing(10);

    body = body.push(container(settings).padding(12));

    body = body.push(
        row![
            button("Cancel").on_press(Message::Cancel),
            button("Defaults").on_press(Message::ResetDefaults),
            button("Apply Settings").on_press(Message::Apply)
        ]
        .spacing(10),
    );

    container(body)
        .padding(16)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
