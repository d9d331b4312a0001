//! Key event handlers for each screen

use crate::catalog::CatalogFocus;
use crate::challenge_view::ControlAction;
use crate::input_key::InputKey;
use crate::message::Message;
use crate::state::AppState;
use instancer_core::Route;

/// Convert key events to messages based on the current screen
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit works everywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }

    match &state.route {
        Route::Catalog => match state.catalog.focus {
            CatalogFocus::List => handle_key_catalog_list(key),
            CatalogFocus::Sidebar => handle_key_catalog_sidebar(key),
            CatalogFocus::Search => handle_key_catalog_search(key),
        },
        Route::Challenge { .. } => handle_key_challenge(key),
        Route::Login { .. } => handle_key_login(key),
        Route::Register => handle_key_form(key, Message::RegisterSubmit),
        Route::Profile => handle_key_profile(key),
    }
}

fn handle_key_catalog_list(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),

        InputKey::Char('j') | InputKey::Down => Some(Message::CatalogCursor(1)),
        InputKey::Char('k') | InputKey::Up => Some(Message::CatalogCursor(-1)),
        InputKey::PageDown => Some(Message::CatalogCursor(10)),
        InputKey::PageUp => Some(Message::CatalogCursor(-10)),
        InputKey::Char('g') | InputKey::Home => Some(Message::CatalogCursor(isize::MIN)),
        InputKey::Char('G') | InputKey::End => Some(Message::CatalogCursor(isize::MAX)),

        InputKey::Enter => Some(Message::OpenChallenge),
        InputKey::Char('/') => Some(Message::CatalogFocus(CatalogFocus::Search)),
        InputKey::Char('f') | InputKey::Tab => Some(Message::CatalogFocus(CatalogFocus::Sidebar)),
        InputKey::Esc => Some(Message::ResetFilter),

        InputKey::Char('r') => Some(Message::FetchChallenges),
        InputKey::Char('p') => Some(Message::Navigate(Route::Profile)),
        InputKey::Char('L') => Some(Message::Logout),
        _ => None,
    }
}

fn handle_key_catalog_sidebar(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('j') | InputKey::Down => Some(Message::SidebarCursor(1)),
        InputKey::Char('k') | InputKey::Up => Some(Message::SidebarCursor(-1)),
        InputKey::Char(' ') | InputKey::Enter => Some(Message::SidebarToggle),
        InputKey::Esc | InputKey::Tab | InputKey::Char('f') => {
            Some(Message::CatalogFocus(CatalogFocus::List))
        }
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_catalog_search(key: InputKey) -> Option<Message> {
    match key {
        // Keep the query, return to the list
        InputKey::Esc | InputKey::Enter => Some(Message::CatalogFocus(CatalogFocus::List)),
        InputKey::Backspace => Some(Message::SearchBackspace),
        _ => key.as_text().map(Message::SearchInput),
    }
}

fn handle_key_challenge(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('d') => Some(Message::Control(ControlAction::Deploy)),
        InputKey::Char('e') => Some(Message::Control(ControlAction::Extend)),
        InputKey::Char('t') => Some(Message::Control(ControlAction::Terminate)),
        InputKey::Char('r') => Some(Message::LoadChallenge),
        InputKey::Esc | InputKey::Char('b') => Some(Message::Navigate(Route::Catalog)),
        InputKey::Char('q') => Some(Message::Quit),
        _ => None,
    }
}

fn handle_key_login(key: InputKey) -> Option<Message> {
    match key {
        InputKey::CharCtrl('r') => Some(Message::Navigate(Route::Register)),
        InputKey::CharCtrl('p') => Some(Message::PreviewLoginToken),
        InputKey::Esc => Some(Message::Quit),
        _ => handle_key_form(key, Message::LoginSubmit),
    }
}

fn handle_key_profile(key: InputKey) -> Option<Message> {
    match key {
        InputKey::CharCtrl('l') => Some(Message::Logout),
        InputKey::CharCtrl('r') => Some(Message::FetchProfile),
        _ => handle_key_form(key, Message::ProfileSubmit),
    }
}

/// Text entry shared by the account forms
fn handle_key_form(key: InputKey, submit: Message) -> Option<Message> {
    match key {
        InputKey::Enter => Some(submit),
        InputKey::Tab | InputKey::BackTab | InputKey::Up | InputKey::Down => {
            Some(Message::FormNextField)
        }
        InputKey::Backspace => Some(Message::FormBackspace),
        InputKey::Esc => Some(Message::Navigate(Route::Catalog)),
        _ => key.as_text().map(Message::FormInput),
    }
}
