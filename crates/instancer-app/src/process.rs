//! Message processing: the TEA update loop plus action dispatch

use tokio::sync::mpsc;

use crate::actions::{handle_action, Services};
use crate::captcha::CaptchaSolver;
use crate::handler;
use crate::message::Message;
use crate::state::AppState;
use instancer_api::InstancerApi;

/// Process a message through the TEA update function, following up on
/// every chained message and dispatching each resulting action
pub fn process_message<A, C>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    services: &mut Services<A, C>,
) where
    A: InstancerApi + Send + Sync + 'static,
    C: CaptchaSolver + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), services);
        }

        msg = result.message;
    }
}
