use crate::app::App;

mod app;
mod router;
mod views;

fn main() {
    yew::Renderer::<App>::new().render();
}
