use yew::prelude::*;

use crate::hooks::use_notifications::Toast;

#[derive(Properties, PartialEq)]
pub struct NotificationAreaProps {
    pub toasts: Vec<Toast>,
    pub busy: bool,
}

/// Toast stack and global loading indicator
#[function_component(NotificationArea)]
pub fn notification_area(props: &NotificationAreaProps) -> Html {
    let indicator_class = if props.busy {
        "indicateur-chargement"
    } else {
        "indicateur-chargement hidden"
    };

    html! {
        <>
            <div id="conteneur-notifications" class="conteneur-notifications">
                {for props.toasts.iter().map(|toast| {
                    html! {
                        <div key={toast.id} class={classes!("notification", toast.kind.class())}>
                            {&toast.message}
                        </div>
                    }
                })}
            </div>
            <div id="indicateur-chargement" class={indicator_class} aria-live="polite">
                <div class="spinner"></div>
            </div>
        </>
    }
}
