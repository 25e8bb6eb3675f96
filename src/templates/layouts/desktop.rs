use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style {
                    "body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; padding: 0 1rem; }"
                    ".card { border: 1px solid #e5e7eb; border-radius: 8px; padding: 1rem 1.25rem; margin-bottom: 1.5rem; }"
                    ".grid { display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem 1.5rem; }"
                    "label { display: block; font-size: 0.9rem; color: #374151; }"
                    "input[type=text], select { width: 100%; padding: 6px; border: 1px solid #ccc; border-radius: 4px; }"
                    ".error { background: #fef2f2; color: #991b1b; padding: 0.75rem; border-radius: 6px; }"
                    "table { width: 100%; border-collapse: collapse; font-size: 0.9em; }"
                    "td, th { padding: 6px 8px; border-bottom: 1px solid #f3f4f6; text-align: left; }"
                }
            }
            body {
                header style="display: flex; justify-content: space-between; align-items: center;" {
                    h3 { "Listing Price Estimator" }
                    nav {
                        a href="/" { "New estimate" }
                    }
                }
                (content)
            }
        }
    }
}
