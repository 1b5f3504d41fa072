//! Interactive TUI for fishdex.

use crate::selection::{SelectionController, SelectionObserver, Transition};
use crate::{CatalogSource, EMPTY_STATE, load_catalog};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use fishdex_catalog::{CardField, Fish};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::time::Duration;
use tracing::{debug, info};

const FOOTER: &str = "↑↓/jk Move | Enter Expand | o Image | r Refresh | q Quit";

// ============================================================================
// Public entry points
// ============================================================================

/// Run the TUI on the catalog list
pub fn run_browse(source: CatalogSource, filter: Option<String>) -> Result<()> {
    let app = App::new_list(source, filter);
    app.run()
}

// ============================================================================
// App state
// ============================================================================

struct App {
    source: CatalogSource,
    screen: Screen,
    should_quit: bool,
    pending_action: Option<PendingAction>,
}

enum Screen {
    /// Transient placeholder used when taking ownership of the screen via `mem::replace`.
    Empty,
    Loading(LoadingState),
    List(ListScreen),
}

struct LoadingState {
    message: String,
    target: LoadingTarget,
}

enum LoadingTarget {
    /// First load of the list.
    List { filter: Option<String> },
    /// Refetch into an existing list, keeping its controller and cursor.
    Refresh { list: ListScreen },
}

/// Remembers which fish the user has opened.
#[derive(Debug, Default)]
struct ViewHistory {
    last: Option<String>,
}

impl SelectionObserver for ViewHistory {
    fn on_expand(&mut self, name: &str) {
        info!(fish = name, "expanded");
        self.last = Some(name.to_string());
    }
}

struct ListScreen {
    items: Vec<Fish>,
    /// Cursor position; independent of which entry is expanded.
    list_state: ListState,
    selection: SelectionController<ViewHistory>,
    filter: Option<String>,
}

impl ListScreen {
    fn new(items: Vec<Fish>, filter: Option<String>) -> Self {
        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            items,
            list_state,
            selection: SelectionController::new(ViewHistory::default()),
            filter,
        }
    }

    /// Swap in a freshly fetched catalog. The selection never outlives the
    /// list it indexed into.
    fn replace_items(&mut self, items: Vec<Fish>) {
        self.selection.reset();
        let cursor = self
            .list_state
            .selected()
            .unwrap_or(0)
            .min(items.len().saturating_sub(1));
        self.list_state = ListState::default();
        if !items.is_empty() {
            self.list_state.select(Some(cursor));
        }
        self.items = items;
    }

    /// Toggle the entry under the cursor. Does nothing on an empty list.
    fn toggle_cursor(&mut self) -> Option<Transition> {
        let index = self.list_state.selected()?;
        if index >= self.items.len() {
            return None;
        }
        let transition = self.selection.toggle(&self.items, index);
        debug!(?transition, "toggled");
        Some(transition)
    }

    fn expanded(&self) -> Option<&Fish> {
        (0..self.items.len())
            .find(|&i| self.selection.is_expanded(&self.items, i))
            .map(|i| &self.items[i])
    }
}

enum PendingAction {
    /// Open a URL in the browser
    OpenUrl { url: String },
}

/// Clamped (non-wrapping) movement on a `ListState` within `0..count`.
fn list_nav(state: &mut ListState, count: usize, forward: bool) {
    if let Some(selected) = state.selected() {
        if forward {
            if selected < count.saturating_sub(1) {
                state.select(Some(selected + 1));
            }
        } else if selected > 0 {
            state.select(Some(selected - 1));
        }
    }
}

fn wait_for_enter() {
    // ratatui::restore() does not re-show the cursor.
    let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);
    println!("\nPress Enter to return to fishdex...");
    let _ = std::io::stdin().read_line(&mut String::new());
}

// ============================================================================
// App implementation
// ============================================================================

impl App {
    fn new_list(source: CatalogSource, filter: Option<String>) -> Self {
        Self {
            source,
            screen: Screen::Loading(LoadingState {
                message: "Loading fish...".to_string(),
                target: LoadingTarget::List { filter },
            }),
            should_quit: false,
            pending_action: None,
        }
    }

    fn run(mut self) -> Result<()> {
        // Restore the terminal before the panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = ratatui::try_restore();
            let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_inner();

        ratatui::restore();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::cursor::Show);

        let _ = std::panic::take_hook();

        result
    }

    fn run_inner(&mut self) -> Result<()> {
        let mut terminal = ratatui::init();

        loop {
            // Fetches resolve here, before drawing and before the next key,
            // so a key never acts on a list that is about to be replaced.
            self.process_loading();

            terminal.draw(|frame| self.render(frame))?;

            if let Some(action) = self.pending_action.take() {
                ratatui::restore();
                self.execute_action(&action);
                terminal = ratatui::init();
                continue;
            }

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Windows reports releases too
                if key.kind == KeyEventKind::Press {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && key.code == KeyCode::Char('c')
                    {
                        break;
                    }
                    self.handle_key(key.code);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn process_loading(&mut self) {
        let screen = std::mem::replace(&mut self.screen, Screen::Empty);

        let Screen::Loading(state) = screen else {
            self.screen = screen;
            return;
        };

        match state.target {
            LoadingTarget::List { filter } => {
                let items = load_catalog(&self.source, filter.as_deref());
                self.screen = Screen::List(ListScreen::new(items, filter));
            }
            LoadingTarget::Refresh { mut list } => {
                let items = load_catalog(&self.source, list.filter.as_deref());
                list.replace_items(items);
                self.screen = Screen::List(list);
            }
        }
    }

    fn execute_action(&self, action: &PendingAction) {
        match action {
            PendingAction::OpenUrl { url } => {
                if let Err(e) = open::that(url) {
                    println!("Failed to open browser: {}", e);
                    println!("URL: {}", url);
                    wait_for_enter();
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let Screen::List(state) = &mut self.screen else {
            return;
        };

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                list_nav(&mut state.list_state, state.items.len(), false);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                list_nav(&mut state.list_state, state.items.len(), true);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                if !state.items.is_empty() {
                    state.list_state.select(Some(0));
                }
            }
            KeyCode::End | KeyCode::Char('G') => {
                if !state.items.is_empty() {
                    state.list_state.select(Some(state.items.len() - 1));
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                state.toggle_cursor();
            }
            KeyCode::Char('o') => {
                if let Some(fish) = state.expanded() {
                    self.pending_action = Some(PendingAction::OpenUrl {
                        url: fish.image_url.clone(),
                    });
                }
            }
            KeyCode::Char('r') => self.start_refresh(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    /// Move the list into a Loading screen that refetches into it.
    fn start_refresh(&mut self) {
        let screen = std::mem::replace(&mut self.screen, Screen::Empty);
        let Screen::List(list) = screen else {
            self.screen = screen;
            return;
        };
        self.screen = Screen::Loading(LoadingState {
            message: "Refreshing...".to_string(),
            target: LoadingTarget::Refresh { list },
        });
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            Screen::Empty => {}
            Screen::Loading(state) => render_loading(frame, state),
            Screen::List(state) => render_list(frame, state),
        }
    }
}

// ============================================================================
// Screen renderers
// ============================================================================

fn render_loading(frame: &mut Frame, state: &LoadingState) {
    let area = frame.area();
    let text = Paragraph::new(state.message.as_str())
        .style(Style::default().fg(Color::Cyan))
        .centered();

    let vertical = Layout::vertical([Constraint::Length(1)]).flex(Flex::Center);
    let [center] = vertical.areas(area);
    frame.render_widget(text, center);
}

/// One accordion row: the header line, plus the card when expanded.
fn fish_list_item(fish: &Fish, expanded: bool, under_cursor: bool) -> ListItem<'_> {
    let marker = if expanded { "[-]" } else { "[+]" };
    let header_style = if under_cursor {
        Style::default().fg(Color::Black).bg(Color::Cyan).bold()
    } else if expanded {
        Style::default().fg(Color::Green).bold()
    } else {
        Style::default()
    };

    let mut lines = vec![Line::styled(format!("{marker} {}", fish.name), header_style)];

    if expanded {
        lines.push(Line::styled(
            format!("    {}", fishdex_catalog::card_title(fish)),
            Style::default().add_modifier(Modifier::UNDERLINED),
        ));
        for (field, text) in fishdex_catalog::card_rows(fish) {
            let style = match field {
                CardField::Price => Style::default().fg(Color::Yellow),
                f if f.is_months() => Style::default().fg(Color::DarkGray),
                _ => Style::default(),
            };
            lines.push(Line::from(vec![Span::raw("    "), Span::styled(text, style)]));
        }
    }

    ListItem::new(Text::from(lines))
}

fn render_list(frame: &mut Frame, state: &mut ListScreen) {
    let area = frame.area();

    let [header, main, status, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    // Header
    let title = match &state.filter {
        Some(f) => format!("All Fish (filter: {})", f),
        None => "All Fish".to_string(),
    };
    frame.render_widget(
        Paragraph::new(title)
            .style(Style::default().bold())
            .centered(),
        header,
    );

    // List
    if state.items.is_empty() {
        let hint = Paragraph::new(format!("  {EMPTY_STATE}"))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, main);
    } else {
        let cursor = state.list_state.selected();
        let items: Vec<ListItem> = state
            .items
            .iter()
            .enumerate()
            .map(|(i, fish)| {
                let expanded = state.selection.is_expanded(&state.items, i);
                fish_list_item(fish, expanded, cursor == Some(i))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, main, &mut state.list_state);
    }

    // Status
    if let Some(name) = &state.selection.observer().last {
        frame.render_widget(
            Paragraph::new(format!("Last viewed: {name}"))
                .style(Style::default().fg(Color::Cyan))
                .centered(),
            status,
        );
    }

    // Footer
    frame.render_widget(
        Paragraph::new(FOOTER)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        footer,
    );
}
