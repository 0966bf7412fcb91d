//! Form and sub-editor rendering

use txdesk_core::table::parse_date;
use txdesk_core::{
    AuxiliaryKind, EditSession, FieldDescriptor, FieldKind, FieldValue, FormController,
    FormLayout, Record,
};
use txdesk_utils::escape_html;

const INPUT_CLASS: &str = "w-full px-3 py-2 border rounded-lg text-sm";

fn is_plain_date(value: &str) -> bool {
    value.len() == 10 && parse_date(value).is_some()
}

/// One labelled input for a field
pub fn render_field(
    descriptor: &FieldDescriptor,
    value: &FieldValue,
    error: Option<&str>,
) -> String {
    let key = escape_html(&descriptor.key);
    let disabled = if descriptor.read_only { " disabled" } else { "" };
    let raw = value.as_input();

    let control = match descriptor.kind {
        FieldKind::Toggle => {
            let checked = if matches!(value, FieldValue::Flag(true)) {
                " checked"
            } else {
                ""
            };
            format!(
                "<input type='checkbox' id='field-{0}' name='{0}' value='on' class='h-4 w-4'{1}{2}>",
                key, checked, disabled
            )
        }
        FieldKind::Choice => {
            let mut options = String::from("<option value=''>Select...</option>");
            let mut found = false;
            for option in &descriptor.options {
                let selected = if *option == raw {
                    found = true;
                    " selected"
                } else {
                    ""
                };
                options.push_str(&format!(
                    "<option value='{0}'{1}>{0}</option>",
                    escape_html(option),
                    selected
                ));
            }
            if !found && !raw.is_empty() {
                options.push_str(&format!(
                    "<option value='{0}' selected>{0}</option>",
                    escape_html(&raw)
                ));
            }
            format!(
                "<select id='field-{0}' name='{0}' class='{1}'{2}>{3}</select>",
                key, INPUT_CLASS, disabled, options
            )
        }
        kind => {
            let input_type = match kind {
                FieldKind::Date if raw.is_empty() || is_plain_date(&raw) => "type='date'",
                FieldKind::Number => "type='text' inputmode='decimal'",
                _ => "type='text'",
            };
            format!(
                "<input {0} id='field-{1}' name='{1}' value='{2}' class='{3}'{4}>",
                input_type,
                key,
                escape_html(&raw),
                INPUT_CLASS,
                disabled
            )
        }
    };

    let marker = if descriptor.required { " *" } else { "" };
    let error_html = error
        .map(|message| {
            format!(
                "<p class='mt-1 text-xs text-red-600'>{}</p>",
                escape_html(message)
            )
        })
        .unwrap_or_default();

    format!(
        "<div><label for='field-{}' class='block text-sm font-medium text-gray-700 mb-1'>{}{}</label>{}{}</div>",
        key,
        escape_html(&descriptor.label),
        marker,
        control,
        error_html
    )
}

fn render_fields<R: Record>(form: &FormController<R>) -> String {
    let mut html = String::from("<div class='grid grid-cols-2 gap-4'>");
    for descriptor in form.active_fields() {
        let value = form
            .draft()
            .field(&descriptor.key)
            .unwrap_or(FieldValue::Empty);
        html.push_str(&render_field(
            descriptor,
            &value,
            form.error_for(&descriptor.key),
        ));
    }
    html.push_str("</div>");
    html
}

fn render_group_nav<R: Record>(form: &FormController<R>) -> String {
    let invalid = form.groups_with_errors();
    if let FormLayout::Stepper { .. } = form.layout() {
        let mut html = String::from("<ol class='flex gap-4 text-sm'>");
        for (index, group) in form.groups().iter().enumerate() {
            let class = if index == form.active_group() {
                "font-semibold text-indigo-600"
            } else if invalid.contains(&index) {
                "text-red-600"
            } else {
                "text-gray-500"
            };
            html.push_str(&format!(
                "<li class='{}'>{}. {}</li>",
                class,
                index + 1,
                escape_html(&group.title)
            ));
        }
        html.push_str("</ol>");
        return html;
    }

    if form.groups().len() < 2 {
        return String::new();
    }
    let mut html = String::from("<div class='flex gap-2 border-b' role='tablist'>");
    for (index, group) in form.groups().iter().enumerate() {
        let class = if index == form.active_group() {
            "border-b-2 border-indigo-600 text-indigo-600"
        } else if invalid.contains(&index) {
            "text-red-600"
        } else {
            "text-gray-500"
        };
        html.push_str(&format!(
            "<button type='button' role='tab' class='px-3 py-2 text-sm {}' hx-post='/form/tab/{}' hx-target='#workspace' hx-swap='outerHTML'>{}</button>",
            class,
            index,
            escape_html(&group.title)
        ));
    }
    html.push_str("</div>");
    html
}

/// Steppers only submit from the last step
fn submit_visible<R: Record>(form: &FormController<R>) -> bool {
    match form.layout() {
        FormLayout::Stepper { .. } => form.is_last_group(),
        _ => true,
    }
}

fn render_buttons<R: Record>(form: &FormController<R>) -> String {
    let mut html = String::from("<div class='flex justify-between pt-4'><div class='flex gap-2'>");
    if !form.is_first_group() {
        html.push_str("<button type='button' class='px-4 py-2 border rounded-lg text-sm' hx-post='/form/back' hx-target='#workspace' hx-swap='outerHTML'>Back</button>");
    }
    if !form.is_last_group() {
        html.push_str("<button type='button' class='px-4 py-2 border rounded-lg text-sm' hx-post='/form/next' hx-target='#workspace' hx-swap='outerHTML'>Next</button>");
    }
    html.push_str("</div><div class='flex gap-2'>");
    html.push_str("<button type='button' class='px-4 py-2 border rounded-lg text-sm' hx-post='/form/cancel' hx-target='#workspace' hx-swap='outerHTML'>Cancel</button>");
    if submit_visible(form) {
        html.push_str("<button type='button' class='px-4 py-2 bg-indigo-600 text-white rounded-lg text-sm' hx-post='/form/submit' hx-target='#workspace' hx-swap='outerHTML'>Submit</button>");
    }
    html.push_str("</div></div>");
    html
}

fn render_editor_buttons(session: &EditSession) -> String {
    let mut html = String::from("<div class='flex gap-2 pt-2 border-t'>");
    for kind in AuxiliaryKind::ALL {
        let saved = if session.has_saved(kind) { " ✓" } else { "" };
        html.push_str(&format!(
            "<button type='button' class='px-3 py-1 border rounded-lg text-xs' hx-post='/form/editors/{}/open' hx-target='#workspace' hx-swap='outerHTML'>{}{}</button>",
            kind,
            kind.title(),
            saved
        ));
    }
    html.push_str("</div>");
    html
}

/// Modal body for one open sub-editor
fn render_editor<R: Record>(kind: AuxiliaryKind, form: &FormController<R>) -> String {
    format!(
        r#"<div id='editor-{0}' class='fixed inset-0 bg-black bg-opacity-30 flex items-center justify-center'>
            <div class='bg-white rounded-lg shadow-lg p-6 w-full max-w-lg space-y-4'>
                <h3 class='text-lg font-semibold'>{1}</h3>
                <form hx-post='/form/editors/{0}/save' hx-target='#workspace' hx-swap='outerHTML'>
                    {2}
                    <div class='flex justify-end gap-2 pt-4'>
                        <button type='button' class='px-4 py-2 border rounded-lg text-sm' hx-post='/form/editors/{0}/close' hx-target='#workspace' hx-swap='outerHTML'>Close</button>
                        <button type='submit' class='px-4 py-2 bg-indigo-600 text-white rounded-lg text-sm'>Save</button>
                    </div>
                </form>
            </div>
        </div>"#,
        kind,
        kind.title(),
        render_fields(form)
    )
}

fn render_open_editor(session: &EditSession) -> String {
    let editor = match session.open_editor_kind() {
        Some(AuxiliaryKind::Channel) => session
            .channel
            .form()
            .map(|form| render_editor(AuxiliaryKind::Channel, form)),
        Some(AuxiliaryKind::Territory) => session
            .territory
            .form()
            .map(|form| render_editor(AuxiliaryKind::Territory, form)),
        Some(AuxiliaryKind::Compensation) => session
            .compensation
            .form()
            .map(|form| render_editor(AuxiliaryKind::Compensation, form)),
        None => None,
    };
    editor.unwrap_or_default()
}

/// The transaction form with its open group and any open sub-editor
pub fn render_form(session: &EditSession, is_editing: bool) -> String {
    let form = &session.form;
    let title = if is_editing {
        "Edit Transaction"
    } else {
        "New Transaction"
    };
    let step = match form.groups().get(form.active_group()) {
        Some(group) if form.groups().len() > 1 => format!(
            "<p class='text-sm text-gray-500'>{} ({} of {})</p>",
            escape_html(&group.title),
            form.active_group() + 1,
            form.groups().len()
        ),
        _ => String::new(),
    };

    let default_action = if submit_visible(form) {
        "/form/submit"
    } else {
        "/form/next"
    };

    format!(
        r#"<div id='transaction-form' class='bg-white rounded-lg border p-6 space-y-4'>
            <div><h2 class='text-lg font-semibold'>{}</h2>{}</div>
            <form id='tx-form' class='space-y-4' hx-post='{}' hx-target='#workspace' hx-swap='outerHTML'>
                {}
                {}
                {}
                {}
            </form>
            {}
        </div>"#,
        title,
        step,
        default_action,
        render_group_nav(form),
        render_fields(form),
        render_buttons(form),
        render_editor_buttons(session),
        render_open_editor(session)
    )
}
