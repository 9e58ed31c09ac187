pub mod contacts;

use yew::{html, Component, Context, Html, Properties};

#[derive(Properties, PartialEq)]
pub struct PlaceholderProps {
    pub title: String,
}

/// Heading-only page for sections without content yet.
pub struct PlaceholderView;

impl Component for PlaceholderView {
    type Message = ();
    type Properties = PlaceholderProps;

    fn create(_ctx: &Context<Self>) -> Self {
        PlaceholderView
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="page">
                <h1>{ &ctx.props().title }</h1>
            </section>
        }
    }
}
