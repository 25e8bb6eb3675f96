use maud::{html, Markup};

pub mod error;

pub use error::html_error_response;

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn text_field(label: &str, name: &str, value: &str) -> Markup {
    html! {
        div {
            label for=(name) { (label) }
            input type="text" id=(name) name=(name) value=(value);
        }
    }
}

pub fn select_field(label: &str, name: &str, options: &[&str], selected: &str) -> Markup {
    html! {
        div {
            label for=(name) { (label) }
            select id=(name) name=(name) {
                @for option in options {
                    option value=(option) selected[*option == selected] { (option) }
                }
            }
        }
    }
}

pub fn checkbox(label: &str, name: &str, checked: bool) -> Markup {
    html! {
        div {
            label {
                input type="checkbox" name=(name) checked[checked];
                " " (label)
            }
        }
    }
}
