//! Contacts page: lists the stored contacts, newest first.

use common::model::contact::Contact;
use common::responses::ErrorResponse;
use gloo_console::error;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::{html, Component, Context, Html};

const CONTACTS_URL: &str = "/api/contacts";

pub enum Msg {
    Loaded(Vec<Contact>),
    Failed(String),
}

pub struct ContactsView {
    contacts: Vec<Contact>,
    loading: bool,
    error: Option<String>,
}

impl Component for ContactsView {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            contacts: Vec::new(),
            loading: true,
            error: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        self.loading = false;
        match msg {
            Msg::Loaded(contacts) => {
                self.contacts = contacts;
                self.error = None;
            }
            Msg::Failed(message) => {
                error!(format!("Loading contacts failed: {}", message));
                self.error = Some(message);
            }
        }
        true
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if !first_render {
            return;
        }

        let link = ctx.link().clone();
        spawn_local(async move {
            let response = match Request::get(CONTACTS_URL).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    link.send_message(Msg::Failed(e.to_string()));
                    return;
                }
            };

            if response.ok() {
                match response.json::<Vec<Contact>>().await {
                    Ok(contacts) => link.send_message(Msg::Loaded(contacts)),
                    Err(e) => link.send_message(Msg::Failed(e.to_string())),
                }
            } else {
                let message = match response.json::<ErrorResponse>().await {
                    Ok(body) => body.error,
                    Err(_) => format!("HTTP {}", response.status()),
                };
                link.send_message(Msg::Failed(message));
            }
        });
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let body = if self.loading {
            html! { <p class="muted">{"Loading contacts..."}</p> }
        } else if let Some(message) = &self.error {
            html! { <p class="error">{ message }</p> }
        } else if self.contacts.is_empty() {
            html! { <p class="muted">{"No contacts yet."}</p> }
        } else {
            html! {
                <table class="contacts">
                    <thead>
                        <tr>
                            <th>{"Name"}</th>
                            <th>{"Email"}</th>
                            <th>{"Company"}</th>
                            <th>{"Email status"}</th>
                            <th>{"Tags"}</th>
                        </tr>
                    </thead>
                    <tbody>
                        { for self.contacts.iter().map(contact_row) }
                    </tbody>
                </table>
            }
        };

        html! {
            <section class="page">
                <h1>{"Contacts"}</h1>
                { body }
            </section>
        }
    }
}

fn contact_row(contact: &Contact) -> Html {
    html! {
        <tr key={contact.id.clone()}>
            <td>{ format!("{} {}", contact.first_name, contact.last_name) }</td>
            <td>{ &contact.email }</td>
            <td>{ contact.company.clone().unwrap_or_default() }</td>
            <td>{ &contact.subscription_status_email }</td>
            <td>{ contact.tags.join(", ") }</td>
        </tr>
    }
}
