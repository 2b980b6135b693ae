use std::rc::Rc;

use chrono::NaiveDate;
use shared::{AvailabilityMap, DisplayedMonth, MonthGrid};
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::services::logging::Logger;

const WEEKDAYS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];

#[derive(Properties, PartialEq)]
pub struct CalendarProps {
    pub displayed: DisplayedMonth,
    pub availability: Rc<AvailabilityMap>,
    pub today: NaiveDate,
    pub on_prev_month: Callback<MouseEvent>,
    pub on_next_month: Callback<MouseEvent>,
    /// Opens the reservation modal on an available day
    pub on_select_day: Callback<NaiveDate>,
    /// "Réserver" button, opens the modal on today
    pub on_book: Callback<MouseEvent>,
}

#[function_component(Calendar)]
pub fn calendar(props: &CalendarProps) -> Html {
    let grid = match MonthGrid::build(props.displayed, &props.availability, props.today) {
        Ok(grid) => grid,
        Err(e) => {
            Logger::error_with_component("calendar", &e.to_string());
            return html! {};
        }
    };

    let mut calendar_days = Vec::new();

    // Empty cells before the 1st, Monday-first
    for _ in 0..grid.leading_blanks {
        calendar_days.push(html! {
            <div class="jour-calendrier vide"></div>
        });
    }

    for cell in &grid.cells {
        let class = classes!(
            "jour-calendrier",
            if cell.available { "disponible" } else { "indisponible" },
            cell.is_today.then_some("aujourdhui"),
        );

        let onclick = cell.available.then(|| {
            let on_select_day = props.on_select_day.clone();
            let date = cell.date;
            Callback::from(move |_: MouseEvent| on_select_day.emit(date))
        });

        calendar_days.push(html! {
            <div {class} data-date={cell.iso()} {onclick}>
                {cell.day}
            </div>
        });
    }

    html! {
        <section class="calendrier">
            <div class="calendrier-entete">
                <button id="btn-mois-precedent" class="calendrier-nav" type="button"
                        onclick={props.on_prev_month.clone()}>{"‹"}</button>
                <h2 id="titre-calendrier" class="calendrier-titre">{grid.title()}</h2>
                <button id="btn-mois-suivant" class="calendrier-nav" type="button"
                        onclick={props.on_next_month.clone()}>{"›"}</button>
            </div>
            <div class="calendrier-jours-semaine">
                {for WEEKDAYS.iter().map(|name| html! { <div class="jour-semaine">{*name}</div> })}
            </div>
            <div id="grille-calendrier" class="grille-calendrier">
                {for calendar_days}
            </div>
            <button id="btn-reserver" class="btn btn-primary" type="button"
                    onclick={props.on_book.clone()}>{"Réserver une tournée"}</button>
        </section>
    }
}
