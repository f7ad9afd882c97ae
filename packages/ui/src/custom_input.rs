use api::FieldSpec;
use dioxus::prelude::*;

/// Labelled form input with an optional validation message underneath.
#[component]
pub fn CustomInput(
    spec: FieldSpec,
    value: String,
    #[props(!optional)] error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    let id = format!("auth-{}", spec.field);

    rsx! {
        div {
            class: "form-item",
            label { class: "form-label", r#for: "{id}", "{spec.label}" }
            div {
                class: "flex w-full flex-col",
                input {
                    id: "{id}",
                    name: spec.field.as_str(),
                    class: if error.is_some() { "input-class input-class--invalid" } else { "input-class" },
                    r#type: spec.input_type,
                    placeholder: spec.placeholder,
                    value: "{value}",
                    oninput: move |evt: FormEvent| oninput.call(evt.value()),
                }
                if let Some(ref message) = error {
                    p { class: "form-message", "{message}" }
                }
            }
        }
    }
}
