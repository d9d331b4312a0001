//! Account forms: login, registration and profile

use instancer_app::account::{AccountField, LoginForm, ProfileState, RegisterForm};
use instancer_app::config::ClientConfig;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget, Wrap},
};

use crate::layout::centered;
use crate::theme::styles;

const FORM_WIDTH: u16 = 60;

/// `label: value█` with the cursor shown on the focused field
fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{:<10}", label),
            if focused {
                styles::accent_bold()
            } else {
                styles::text_secondary()
            },
        ),
        Span::styled(value.to_string(), styles::text_primary()),
    ];
    if focused {
        spans.push(Span::styled("█", styles::accent()));
    }
    Line::from(spans)
}

fn feedback_lines(busy: Option<&str>, notice: Option<&str>, error: Option<&str>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(text) = busy {
        lines.push(Line::from(Span::styled(text.to_string(), styles::status_yellow())));
    }
    if let Some(text) = notice {
        lines.push(Line::from(Span::styled(text.to_string(), styles::status_green())));
    }
    if let Some(text) = error {
        lines.push(Line::from(Span::styled(text.to_string(), styles::status_red())));
    }
    lines
}

fn render_form(title: &str, lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    let height = (lines.len() as u16 + 2).max(5);
    let rect = centered(area, FORM_WIDTH, height);
    Clear.render(rect, buf);
    Paragraph::new(lines)
        .block(styles::glass_block(true).title(format!(" {} ", title)))
        .wrap(Wrap { trim: false })
        .render(rect, buf);
}

/// Login token form
pub struct LoginPanel<'a> {
    form: &'a LoginForm,
    client: &'a ClientConfig,
}

impl<'a> LoginPanel<'a> {
    pub fn new(form: &'a LoginForm, client: &'a ClientConfig) -> Self {
        Self { form, client }
    }
}

impl Widget for LoginPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();

        if self.form.validating_session {
            lines.push(Line::from(Span::styled(
                "Checking saved session…",
                styles::text_muted(),
            )));
            render_form("Login", lines, area, buf);
            return;
        }

        lines.push(Line::from(Span::styled(
            "Paste the login token from your team's login link.",
            styles::text_secondary(),
        )));
        if let Some(hint) = self.client.rctf_login_hint() {
            lines.push(Line::from(vec![
                Span::styled("Get one at ", styles::text_muted()),
                Span::styled(hint.to_string(), styles::accent()),
            ]));
        }
        lines.push(Line::default());
        lines.push(field_line("Token", &self.form.token, !self.form.submitting));

        if let Some(team) = &self.form.preview {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<10}", "Team"), styles::text_secondary()),
                Span::styled(team.clone(), styles::status_green()),
            ]));
        }
        if let Some(chall) = &self.form.chall {
            lines.push(Line::from(Span::styled(
                format!("Continues to challenge {}", chall),
                styles::text_muted(),
            )));
        }

        lines.push(Line::default());
        lines.extend(feedback_lines(
            self.form.submitting.then_some("Logging in…"),
            None,
            self.form.error.as_deref(),
        ));

        render_form("Login", lines, area, buf);
    }
}

/// New team registration
pub struct RegisterPanel<'a> {
    form: &'a RegisterForm,
}

impl<'a> RegisterPanel<'a> {
    pub fn new(form: &'a RegisterForm) -> Self {
        Self { form }
    }
}

impl Widget for RegisterPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            field_line(
                "Username",
                &self.form.username,
                self.form.focus == AccountField::Username,
            ),
            field_line(
                "Email",
                &self.form.email,
                self.form.focus == AccountField::Email,
            ),
            Line::default(),
        ];
        lines.extend(feedback_lines(
            self.form.submitting.then_some("Registering…"),
            None,
            self.form.error.as_deref(),
        ));

        render_form("Register", lines, area, buf);
    }
}

/// Profile editor with the team's login link
pub struct ProfilePanel<'a> {
    profile: &'a ProfileState,
}

impl<'a> ProfilePanel<'a> {
    pub fn new(profile: &'a ProfileState) -> Self {
        Self { profile }
    }
}

impl Widget for ProfilePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.profile.loading {
            render_form(
                "Profile",
                vec![Line::from(Span::styled("Loading profile…", styles::text_muted()))],
                area,
                buf,
            );
            return;
        }

        let mut lines = vec![
            field_line(
                "Username",
                &self.profile.username,
                self.profile.focus == AccountField::Username,
            ),
            field_line(
                "Email",
                &self.profile.email,
                self.profile.focus == AccountField::Email,
            ),
        ];

        if let Some(profile) = self.profile.profile.as_ref().filter(|p| !p.login_url.is_empty()) {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Login link (keep it secret):",
                styles::text_secondary(),
            )));
            lines.push(Line::from(Span::styled(
                profile.login_url.clone(),
                styles::accent(),
            )));
        }

        lines.push(Line::default());
        lines.extend(feedback_lines(
            self.profile.submitting.then_some("Saving…"),
            self.profile.notice.as_deref(),
            self.profile.error.as_deref(),
        ));

        render_form("Profile", lines, area, buf);
    }
}
