//! What the body of the screen should show for a given fetch state

use crate::contact::Contact;
use crate::fetch::FetchMachine;

pub const NO_CONTACTS_MESSAGE: &str = "No contacts available.";
pub const NO_MATCHES_MESSAGE: &str = "No contacts found matching your search.";

/// The four mutually exclusive body views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    FullPageSpinner,
    ErrorPanel { message: &'a str },
    Empty { message: &'static str },
    Table { contacts: &'a [Contact] },
}

/// A body view plus whether the small loading indicator is shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation<'a> {
    pub view: View<'a>,
    pub inline_spinner: bool,
}

pub fn select<'a>(machine: &'a FetchMachine, debounced_query: &str) -> Presentation<'a> {
    if machine.is_initial_loading() {
        return Presentation {
            view: View::FullPageSpinner,
            inline_spinner: false,
        };
    }

    let view = if let Some(message) = machine.error() {
        View::ErrorPanel { message }
    } else if machine.contacts().is_empty() {
        View::Empty {
            message: empty_message(debounced_query),
        }
    } else {
        View::Table {
            contacts: machine.contacts(),
        }
    };

    Presentation {
        view,
        inline_spinner: machine.is_loading(),
    }
}

pub fn empty_message(debounced_query: &str) -> &'static str {
    if debounced_query.is_empty() {
        NO_CONTACTS_MESSAGE
    } else {
        NO_MATCHES_MESSAGE
    }
}
