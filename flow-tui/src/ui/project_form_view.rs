use super::*;
use crate::app::{human_size, FieldErrors, FormField, ProjectForm};

const LABEL_WIDTH: usize = 16;

pub fn render_project_form(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(form) = &app.form else {
        return;
    };
    let area = clear_popup(frame, 84, 34, palette);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let (lines, focus_line) = form_lines(form, palette);
    let visible = chunks[0].height.saturating_sub(2);
    let scroll = (focus_line as u16).saturating_sub(visible.saturating_sub(3));
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(panel(form.title().trim(), palette, true)),
        chunks[0],
    );

    let hints: &[(&str, &str)] = if form.submitting {
        &[("Esc", "Close")]
    } else {
        &[
            ("Tab", "Next"),
            ("↑/↓", "Change"),
            ("Enter", "Add"),
            ("Ctrl+X", "Remove last"),
            ("Ctrl+S", "Save"),
            ("Esc", "Cancel"),
        ]
    };
    render_hints(frame, chunks[1], palette, hints);
}

/// All form rows, plus the index of the row holding focus.
fn form_lines<'a>(form: &'a ProjectForm, palette: &Palette) -> (Vec<Line<'a>>, usize) {
    let mut lines = Vec::new();
    let mut focus_line = 0;

    for field in FormField::ALL {
        let focused = form.focused == field;
        if focused {
            focus_line = lines.len();
        }
        if field == FormField::Submit {
            lines.push(Line::from(""));
            lines.push(submit_line(form, focused, palette));
            continue;
        }

        lines.push(Line::from(vec![
            label_span(field, focused, form.errors.has(field), palette),
            Span::styled(field_value(form, field, focused), palette.text()),
        ]));

        if form.errors.has(field) {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(LABEL_WIDTH)),
                Span::styled(FieldErrors::message(field), palette.error()),
            ]));
        }
        lines.extend(list_rows(form, field, palette));
    }

    (lines, focus_line)
}

fn label_span(field: FormField, focused: bool, invalid: bool, palette: &Palette) -> Span<'static> {
    let style = if invalid {
        palette.error()
    } else if focused {
        palette.selected()
    } else {
        palette.dim()
    };
    let marker = if focused { "▶ " } else { "  " };
    Span::styled(
        format!("{}{:<width$}", marker, field.label(), width = LABEL_WIDTH - 2),
        style,
    )
}

fn field_value(form: &ProjectForm, field: FormField, focused: bool) -> String {
    match field {
        FormField::Name => utils::input_text(&form.name, focused, ""),
        FormField::Client => utils::input_text(&form.client, focused, ""),
        FormField::Manager => utils::input_text(&form.manager, focused, ""),
        FormField::Description => utils::input_text(&form.description, focused, ""),
        FormField::Budget => utils::input_text(&form.budget, focused, "0.00"),
        FormField::StartDate => form.start_date.display(focused),
        FormField::EndDate => {
            let text = form.end_date.display(focused);
            match form.end_date.min() {
                Some(min) if focused => {
                    format!("{}  (not before {})", text, crate::time_utils::format_date(min))
                }
                _ => text,
            }
        }
        FormField::Priority => choice(form.priority.to_string(), focused),
        FormField::Status => choice(form.status.to_string(), focused),
        FormField::Tags => utils::input_text(&form.tag_input, focused, "add a tag"),
        FormField::TeamMembers => utils::input_text(&form.member_input, focused, "add a member"),
        FormField::Attachments => {
            utils::input_text(&form.attachment_input, focused, "path to a file")
        }
        FormField::Submit => String::new(),
    }
}

fn choice(value: String, focused: bool) -> String {
    if focused {
        format!("◀ {} ▶", value)
    } else {
        value
    }
}

/// Chips and files listed under the tag, team and attachment inputs.
fn list_rows<'a>(form: &'a ProjectForm, field: FormField, palette: &Palette) -> Vec<Line<'a>> {
    let indent = || Span::raw(" ".repeat(LABEL_WIDTH));
    match field {
        FormField::Tags | FormField::TeamMembers => {
            let values = if field == FormField::Tags {
                &form.tags
            } else {
                &form.team_members
            };
            if values.is_empty() {
                return Vec::new();
            }
            let mut spans = vec![indent()];
            for value in values {
                spans.push(Span::styled(format!("[{}] ", value), palette.accent()));
            }
            vec![Line::from(spans)]
        }
        FormField::Attachments => {
            let existing = form.existing_attachments.iter().map(|a| {
                Line::from(vec![
                    indent(),
                    Span::styled(a.name.as_str(), palette.text()),
                    Span::styled(format!("  {}", human_size(a.size)), palette.dim()),
                ])
            });
            let staged = form.staged.iter().map(|s| {
                Line::from(vec![
                    indent(),
                    Span::styled("+ ", Style::default().fg(palette.success)),
                    Span::styled(s.file.name.as_str(), palette.text()),
                    Span::styled(
                        format!("  {}  {}", human_size(s.file.size), s.file.content_type),
                        palette.dim(),
                    ),
                ])
            });
            existing.chain(staged).collect()
        }
        _ => Vec::new(),
    }
}

fn submit_line<'a>(form: &ProjectForm, focused: bool, palette: &Palette) -> Line<'a> {
    let text = if form.submitting {
        "Saving...".to_string()
    } else {
        format!("[ {} ]", form.title().trim())
    };
    let style = if focused {
        palette.selected().add_modifier(Modifier::REVERSED)
    } else {
        palette.accent()
    };
    Line::from(Span::styled(text, style)).alignment(Alignment::Center)
}
