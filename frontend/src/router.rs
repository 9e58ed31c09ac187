//! Client-side page routing for the dashboard.
//!
//! Every known path maps to one view; anything else redirects to the
//! dashboard. Each navigation also updates the document title to
//! `"<page title> | CRM Dashboard"`.

use crate::views::contacts::ContactsView;
use crate::views::PlaceholderView;
use yew::prelude::*;
use yew_router::prelude::*;

const APP_TITLE: &str = "CRM Dashboard";

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Dashboard,
    #[at("/contacts")]
    Contacts,
    #[at("/deals")]
    Deals,
    #[at("/reports")]
    Reports,
    #[at("/settings")]
    Settings,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Page title shown in the header and the browser tab.
    pub fn title(&self) -> Option<&'static str> {
        match self {
            Route::Dashboard => Some("Dashboard Overview"),
            Route::Contacts => Some("Contacts"),
            Route::Deals => Some("Deals & Opportunities"),
            Route::Reports => Some("Reports"),
            Route::Settings => Some("Settings"),
            Route::NotFound => None,
        }
    }

    /// Entries of the navigation bar, in display order.
    pub fn navigation() -> [Route; 5] {
        [
            Route::Dashboard,
            Route::Contacts,
            Route::Deals,
            Route::Reports,
            Route::Settings,
        ]
    }
}

pub fn document_title(route: &Route) -> String {
    match route.title() {
        Some(title) => format!("{} | {}", title, APP_TITLE),
        None => APP_TITLE.to_string(),
    }
}

fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub route: Route,
}

/// Renders the view of one route and retitles the document once it is shown.
pub struct Page;

impl Component for Page {
    type Message = ();
    type Properties = PageProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Page
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        match &ctx.props().route {
            Route::Contacts => html! { <ContactsView /> },
            route => {
                let title = route.title().unwrap_or_default().to_string();
                html! { <PlaceholderView {title} /> }
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        set_document_title(&document_title(&ctx.props().route));
    }
}

/// `Switch` render callback: resolves a route to its page.
pub fn switch(route: Route) -> Html {
    match route {
        Route::NotFound => html! { <Redirect<Route> to={Route::Dashboard} /> },
        route => html! { <Page {route} /> },
    }
}
