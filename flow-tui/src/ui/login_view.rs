use super::*;
use crate::auth::Route;

pub fn render_login(frame: &mut Frame, app: &App, _body: Rect, palette: &Palette) {
    let area = utils::centered_rect(60, 11, frame.area());
    frame.render_widget(Clear, area);

    // Token is never shown in clear text
    let masked = "•".repeat(app.login.token.value.chars().count());
    let token_line = if app.login.submitting {
        Line::from(Span::styled("Verifying...", palette.dim()))
    } else {
        Line::from(vec![
            Span::styled("Token: ", palette.accent()),
            Span::styled(format!("{}█", masked), palette.text().add_modifier(Modifier::BOLD)),
        ])
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Paste an API token to sign in.",
            palette.text(),
        )),
        Line::from(""),
        token_line,
        Line::from(""),
    ];
    if let Route::Login {
        redirect: Some(target),
    } = &app.route
    {
        lines.push(Line::from(Span::styled(
            format!("Continues to {}", target),
            palette.dim(),
        )));
    }
    lines.push(Line::from(utils::key_hints(
        palette,
        &[("Enter", "Sign in"), ("Ctrl+U", "Clear"), ("Ctrl+C", "Quit")],
    )));

    frame.render_widget(
        Paragraph::new(lines).block(panel("Sign in", palette, true)),
        area,
    );
}
