#![forbid(unsafe_code)]

//! Inbox model: messages, filter, list state and the actions that move them.
//!
//! [`InboxApp::apply`] reports whether the screen needs a redraw. A redraw
//! is cheap: the list blits cached rows and only materializes cards that
//! entered its render range, so the host can redraw on every `true`.

use tracing::{debug, warn};
use vlist::{
    Alignment, Color, Frame, Hit, HitId, HitRegion, ItemSource, Label, ListConfig, Rect,
    RenderRange, ScrollBinding, ScrollbarState, StatefulWidget, Style, Subscription,
    VirtualizedList, VirtualizedListState, Widget,
};

use crate::data::{MessageList, MessageRepository};

/// Hit id the message list registers under.
pub const LIST_HIT: HitId = HitId::new(1);

const HEADER_STYLE: Style = Style::new().fg(Color::White).bg(Color::Blue);
const STATUS_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Gray);
const HIGHLIGHT_STYLE: Style = Style::new().bg(Color::DarkGray);

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Scroll by this many steps (negative is up).
    ScrollLines(i64),
    /// Jump to an absolute row offset.
    ScrollTo(usize),
    PageUp,
    PageDown,
    Home,
    End,
    SelectNext,
    SelectPrevious,
    /// Flag or unflag the selected message.
    ToggleFlag,
    /// Pin the viewport to the newest end of the list.
    ToggleFollow,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    Resize { width: u16, height: u16 },
    /// A mouse click resolved through the frame's hit grid.
    Click(Hit),
    Quit,
}

/// The inbox screen.
#[derive(Debug)]
pub struct InboxApp<R> {
    repo: R,
    config: ListConfig,
    messages: MessageList,
    query: String,
    list: VirtualizedListState,
    binding: ScrollBinding,
    _range_log: Subscription,
    size: (u16, u16),
    quit: bool,
}

/// Rows left for the list under the header and above the status line.
fn list_area(width: u16, height: u16) -> Rect {
    let (_, rest) = Rect::from_size(width, height).split_top(1);
    rest.split_bottom(1).0
}

impl<R: MessageRepository> InboxApp<R> {
    /// Build the screen for a `width x height` terminal.
    pub fn new(repo: R, config: ListConfig, width: u16, height: u16) -> vlist::Result<Self> {
        let config = config.into_validated()?;
        let messages = MessageList::new(repo.fetch_all());
        let rows = list_area(width, height).height.max(1);
        let binding = ScrollBinding::new(config.to_window_spec(messages.len(), f64::from(rows))?);
        let range_log = binding.on_range_change(|range: &RenderRange| {
            debug!(
                start = range.start,
                end = range.end,
                "inbox render range changed"
            );
        });
        let list = VirtualizedListState::new()
            .with_overscan(config.overscan)
            .with_follow(config.follow_tail);
        debug!(
            messages = messages.len(),
            item_height = config.item_height,
            overscan = config.overscan,
            "inbox ready"
        );
        Ok(Self {
            repo,
            config,
            messages,
            query: String::new(),
            list,
            binding,
            _range_log: range_log,
            size: (width, height),
            quit: false,
        })
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageList {
        &self.messages
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn list_state(&self) -> &VirtualizedListState {
        &self.list
    }

    pub fn binding(&self) -> &ScrollBinding {
        &self.binding
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Apply `action`; returns whether the screen needs a redraw.
    pub fn apply(&mut self, action: Action) -> bool {
        let before = (self.list.scroll_offset(), self.list.selected());
        let changed = match action {
            Action::ScrollLines(steps) => self
                .list
                .scroll_by(steps.saturating_mul(i64::from(self.config.scroll_step))),
            Action::ScrollTo(offset) => self.list.scroll_to_offset(offset),
            Action::PageUp => self.list.page_up(),
            Action::PageDown => self.list.page_down(),
            Action::Home => self.list.scroll_to_top(),
            Action::End => self.list.scroll_to_bottom(),
            Action::SelectNext => self.list.select_next(),
            Action::SelectPrevious => self.list.select_previous(),
            Action::ToggleFlag => self.toggle_flag(),
            Action::ToggleFollow => {
                let follow = !self.list.follow_mode();
                self.list.set_follow(follow);
                true
            }
            Action::SearchInput(ch) => {
                self.query.push(ch);
                self.refilter()
            }
            Action::SearchBackspace => self.query.pop().is_some() && self.refilter(),
            Action::SearchClear => {
                if self.query.is_empty() {
                    false
                } else {
                    self.query.clear();
                    self.refilter()
                }
            }
            Action::Resize { width, height } => {
                let changed = self.size != (width, height);
                self.size = (width, height);
                changed
            }
            Action::Click(hit) => self.click(hit),
            Action::Quit => {
                self.quit = true;
                false
            }
        };
        let changed = changed || before != (self.list.scroll_offset(), self.list.selected());
        self.sync_binding();
        debug!(?action, changed, offset = self.list.scroll_offset(), "inbox action");
        changed
    }

    fn refilter(&mut self) -> bool {
        self.messages.replace(self.repo.search(&self.query));
        self.list.select(None);
        self.list.scroll_to_top();
        debug!(query = %self.query, matches = self.messages.len(), "inbox filter");
        true
    }

    fn toggle_flag(&mut self) -> bool {
        let Some(index) = self.list.selected() else {
            return false;
        };
        let Some((id, flagged)) = self
            .messages
            .update(index, |m| m.flagged = !m.flagged)
            .map(|m| (m.id, m.flagged))
        else {
            return false;
        };
        if !self.repo.set_flagged(id, flagged) {
            warn!(id, "flagged message missing from repository");
        }
        true
    }

    fn click(&mut self, hit: Hit) -> bool {
        if hit.id != LIST_HIT {
            return false;
        }
        match hit.region {
            HitRegion::Content => {
                let Ok(index) = usize::try_from(hit.data) else {
                    return false;
                };
                let selected = self.list.select(Some(index));
                let opened = self
                    .messages
                    .get(index)
                    .is_some_and(|m| m.unread)
                    && self.messages.update(index, |m| m.unread = false).is_some();
                selected || opened
            }
            HitRegion::Scrollbar => {
                let track = list_area(self.size.0, self.size.1).height;
                let content = self.messages.len() * usize::from(self.config.item_height);
                let bar = ScrollbarState::new(content, self.list.scroll_offset(), usize::from(track));
                let row = u16::try_from(hit.data).unwrap_or(u16::MAX);
                self.list.scroll_to_offset(bar.position_for_row(row, track))
            }
            _ => false,
        }
    }

    fn sync_binding(&mut self) {
        let rows = list_area(self.size.0, self.size.1).height;
        self.binding.replace_items(self.messages.len());
        if rows > 0
            && let Err(err) = self.binding.resize(f64::from(rows))
        {
            warn!(%err, "scroll binding rejected viewport");
        }
        self.binding.scroll_to(self.list.scroll_offset() as f64);
    }

    /// Draw header, list and status line.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.is_empty() {
            return;
        }
        let (header, rest) = area.split_top(1);
        let (body, status) = rest.split_bottom(1);

        self.draw_header(header, frame);

        match VirtualizedList::new(&self.messages, self.config.item_height) {
            Ok(list) => list
                .show_scrollbar(self.config.show_scrollbar)
                .highlight_style(HIGHLIGHT_STYLE)
                .hit_id(LIST_HIT)
                .render(body, frame, &mut self.list),
            Err(err) => warn!(%err, "message list not drawn"),
        }
        // The list clamps its offset while rendering.
        self.sync_binding();

        self.draw_status(status, frame);
    }

    fn draw_header(&self, area: Rect, frame: &mut Frame) {
        let title = format!(
            " Inbox  {} messages, {} unread",
            self.messages.len(),
            self.messages.unread_count()
        );
        Label::new(&title).style(HEADER_STYLE).render(area, frame);
        if self.query.is_empty() {
            Label::new("type to search ")
                .style(HEADER_STYLE.dim())
                .alignment(Alignment::Right)
                .render(area, frame);
            frame.set_cursor(None);
        } else {
            let search = format!("/{} ", self.query);
            Label::new(&search)
                .style(HEADER_STYLE.bold())
                .alignment(Alignment::Right)
                .render(area, frame);
            frame.set_cursor(Some((area.right().saturating_sub(1), area.y)));
        }
    }

    fn draw_status(&self, area: Rect, frame: &mut Frame) {
        let text = match self.list.window() {
            Some(window) if !window.range.is_empty() => {
                let stats = self.list.stats();
                format!(
                    " {}-{}/{}  new {}  kept {}  changes {}{}",
                    window.range.start,
                    window.range.end,
                    self.messages.len(),
                    stats.last_items_rendered,
                    stats.last_cache_hits,
                    self.binding.version(),
                    if self.list.follow_mode() { "  follow" } else { "" },
                )
            }
            _ if self.query.is_empty() => " no messages".to_string(),
            _ => format!(" no messages match \"{}\"", self.query),
        };
        Label::new(&text).style(STATUS_STYLE).render(area, frame);
    }

    /// Render one frame and return its text.
    pub fn snapshot(&mut self) -> Vec<String> {
        let (width, height) = self.size;
        let mut frame = Frame::with_hit_grid(width, height);
        self.view(&mut frame);
        frame.buffer.to_lines()
    }
}
