//! Challenge detail widgets: metadata card and deployment controls

use instancer_app::{ChallengeView, ControlAction, ControllerState, LoadState};
use instancer_core::{format_countdown, ChallengeInfo, PortEntry, PortsView};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::theme::styles;

/// Full challenge screen body
pub struct ChallengePanel<'a> {
    view: &'a ChallengeView,
    now: i64,
}

impl<'a> ChallengePanel<'a> {
    pub fn new(view: &'a ChallengeView, now: i64) -> Self {
        Self { view, now }
    }
}

impl Widget for ChallengePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let info = match &self.view.load {
            LoadState::Loading => {
                Paragraph::new(Span::styled("Loading challenge…", styles::text_muted()))
                    .block(styles::glass_block(false))
                    .render(area, buf);
                return;
            }
            LoadState::NotFound => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Challenge not found",
                        styles::status_red().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        format!("No challenge with id \"{}\" exists.", self.view.id),
                        styles::text_secondary(),
                    )),
                ];
                Paragraph::new(lines)
                    .block(styles::glass_block(false))
                    .render(area, buf);
                return;
            }
            LoadState::Found(info) => info,
        };

        let controls = DeploymentCard::new(self.view, self.now);
        let chunks = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(controls.height()),
        ])
        .split(area);

        InfoCard { info }.render(chunks[0], buf);
        controls.render(chunks[1], buf);
    }
}

/// Name, author, labels and description
struct InfoCard<'a> {
    info: &'a ChallengeInfo,
}

impl Widget for InfoCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).title(format!(" {} ", self.info.name));

        let mut header = vec![Span::styled(
            format!("by {}", self.info.author),
            styles::text_secondary(),
        )];
        for category in self.info.categories() {
            header.push(Span::raw("  "));
            header.push(Span::styled(format!("[{}]", category), styles::accent()));
        }
        for tag in self.info.tags() {
            header.push(Span::raw("  "));
            header.push(Span::styled(format!("#{}", tag), styles::status_blue()));
        }

        let mut lines = vec![Line::from(header), Line::default()];
        lines.extend(
            self.info
                .description
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), styles::text_primary()))),
        );

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Controller state, countdown, connection info, buttons and feedback
pub struct DeploymentCard<'a> {
    view: &'a ChallengeView,
    now: i64,
}

impl<'a> DeploymentCard<'a> {
    pub fn new(view: &'a ChallengeView, now: i64) -> Self {
        Self { view, now }
    }

    /// Rows needed including borders
    pub fn height(&self) -> u16 {
        let ports = match self.view.ports(self.now) {
            Some(PortsView::Ready(entries)) => entries.len().max(1),
            Some(PortsView::Booting) => 1,
            None => 0,
        };
        let feedback = usize::from(self.view.error.is_some() || self.view.notice.is_some());
        // borders + status + blank + buttons
        (2 + 1 + ports + 1 + 1 + feedback) as u16
    }

    fn status_line(&self) -> Line<'static> {
        let state = self.view.controller_state(self.now);
        let (icon, label, style) = styles::controller_indicator(state);
        let mut spans = vec![Span::styled(format!("{} {}", icon, label), style)];

        if self.view.countdown.running {
            spans.push(Span::styled("  expires in ", styles::text_secondary()));
            spans.push(Span::styled(
                format_countdown(self.view.countdown.remaining),
                styles::accent_bold(),
            ));
        }
        if self.view.is_shared() {
            spans.push(Span::styled("  (shared instance)", styles::text_muted()));
        }
        Line::from(spans)
    }

    fn port_lines(&self) -> Vec<Line<'static>> {
        match self.view.ports(self.now) {
            None => Vec::new(),
            Some(PortsView::Booting) => vec![Line::from(Span::styled(
                "Instance is starting…",
                styles::status_yellow(),
            ))],
            Some(PortsView::Ready(entries)) if entries.is_empty() => vec![Line::from(
                Span::styled("No ports published", styles::text_muted()),
            )],
            Some(PortsView::Ready(entries)) => entries
                .iter()
                .map(|entry| {
                    let target_style = match entry {
                        PortEntry::Link { .. } => styles::accent(),
                        PortEntry::Command { .. } => styles::text_primary(),
                    };
                    Line::from(vec![
                        Span::styled(format!("{:<12} ", entry.label()), styles::text_secondary()),
                        Span::styled(entry.target().to_string(), target_style),
                    ])
                })
                .collect(),
        }
    }

    fn button(&self, action: ControlAction, key: &'static str) -> Vec<Span<'static>> {
        let busy = self.view.busy.get(action);
        let label = match (action, busy) {
            (ControlAction::Deploy, true) => "Deploying…",
            (ControlAction::Extend, true) => "Extending…",
            (ControlAction::Terminate, true) => "Terminating…",
            (ControlAction::Deploy, false) => "Deploy",
            (ControlAction::Extend, false) => "Extend",
            (ControlAction::Terminate, false) => "Terminate",
        };
        let enabled = self.view.can(action, self.now);
        let (key_style, label_style) = if enabled {
            (styles::keybinding(), styles::text_primary())
        } else if busy {
            (styles::text_muted(), styles::status_yellow())
        } else {
            (styles::text_muted(), styles::text_muted())
        };
        vec![
            Span::styled(format!("[{}] ", key), key_style),
            Span::styled(label, label_style),
        ]
    }

    fn buttons_line(&self) -> Line<'static> {
        let deployed = self.view.is_deployed(self.now);
        let state = self.view.controller_state(self.now);

        // Deploy while nothing is live; extend and terminate once it is
        let show_deploy = !deployed || state == ControllerState::Deploying;
        let mut spans = Vec::new();
        if show_deploy {
            spans.extend(self.button(ControlAction::Deploy, "d"));
        } else if !self.view.is_shared() {
            spans.extend(self.button(ControlAction::Extend, "e"));
            spans.push(Span::raw("    "));
            spans.extend(self.button(ControlAction::Terminate, "t"));
        }
        Line::from(spans)
    }
}

impl Widget for DeploymentCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = if self.view.shake {
            styles::shake_block()
        } else {
            styles::glass_block(self.view.is_deployed(self.now))
        };
        let block = block.title(" Instance ");

        let mut lines = vec![self.status_line()];
        lines.extend(self.port_lines());
        lines.push(Line::default());
        lines.push(self.buttons_line());

        if let Some(error) = &self.view.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                styles::status_red().add_modifier(Modifier::BOLD),
            )));
        } else if let Some(notice) = &self.view.notice {
            lines.push(Line::from(Span::styled(
                notice.clone(),
                styles::status_green(),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
