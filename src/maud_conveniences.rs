use maud::{Markup, Render, html};

/// One table cell, `field` names the column in the cell's test id.
pub struct Cell {
    pub field: &'static str,
    pub content: Markup,
}

impl Cell {
    pub fn new(field: &'static str, content: impl Render) -> Self {
        Self {
            field,
            content: content.render(),
        }
    }
}

/// Cells get `data-testid="{test_id}-cell-row-{row}-col-{field}"`.
pub fn render_table(test_id: &str, headers: &[&str], rows: Vec<Vec<Cell>>) -> Markup {
    html! {
        div class="overflow-x-auto" {
            table class="min-w-full bg-gray-800 rounded shadow-md" data-testid=(test_id) {
                thead class="bg-gray-700" {
                    tr {
                        @for header in headers {
                            th class="py-2 px-4 text-left font-semibold text-gray-300" {(header)}
                        }
                    }
                }
                tbody {
                    @for (i, row) in rows.into_iter().enumerate() {
                        tr {
                            @for cell in row {
                                td class="py-2 px-4 border-b border-gray-600 text-gray-200" data-testid={(test_id) "-cell-row-" (i) "-col-" (cell.field)} {(cell.content)}
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, inner: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (inner)
        }
    }
}

/// A text input, marked invalid with the message underneath when `error` is set.
pub fn text_form_element(
    id: &'static str,
    label: &'static str,
    value: &str,
    error: Option<&str>,
) -> Markup {
    let border = if error.is_some() {
        "border-red-500"
    } else {
        "border-gray-600"
    };

    form_element(
        id,
        label,
        html! {
            input type="text" id=(id) name=(id) value=(value) aria-invalid=[error.map(|_| "true")] class={"shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 " (border)};
            @if let Some(error) = error {
                div class="text-red-400 text-sm mt-1" data-testid={(id) "-error"} {(error)}
            }
        },
    )
}

pub fn form_submit_button(label: &str) -> Markup {
    html! {
        div class="flex items-center justify-between" {
            button type="submit" class="bg-blue-500 hover:bg-blue-700 disabled:opacity-50 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                (label)
            }
        }
    }
}

pub fn error_banner(message: &str) -> Markup {
    html! {
        div class="bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded relative mb-4 flex justify-between" role="alert" data-testid="error-banner" {
            span {(message)}
            button type="button" class="font-bold ml-4" aria-label="Dismiss" onclick="this.parentElement.remove()" {"×"}
        }
    }
}
