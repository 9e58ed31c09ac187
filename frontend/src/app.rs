use crate::router::{switch, Route};
use yew::{html, Component, Context, Html};
use yew_router::prelude::*;

pub struct App;

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        html! {
            <BrowserRouter>
                <nav class="sidebar">
                    <span class="brand">{"CRM Dashboard"}</span>
                    { for Route::navigation().into_iter().map(|route| {
                        let label = route.title().unwrap_or_default();
                        html! { <Link<Route> to={route}>{ label }</Link<Route>> }
                    }) }
                </nav>
                <main>
                    <Switch<Route> render={switch} />
                </main>
            </BrowserRouter>
        }
    }
}
