//! Bot actor running a bot's pull-loop.

use ractor::{Actor, ActorProcessingErr, ActorRef};

use crate::bot::Bot;
use crate::controller::WeakController;
use crate::messages::{Assignment, BotMessage};

/// State for the bot actor.
pub struct BotActorState {
    /// The bot this loop drives.
    pub bot: Bot,
    /// Controller handing out orders. The loop exits once it is dropped.
    pub controller: WeakController,
}

/// Bot actor arguments.
pub struct BotArgs {
    pub bot: Bot,
    pub controller: WeakController,
}

/// Actor that repeatedly asks the controller for work on behalf of one bot.
///
/// Each `Poll` message is one iteration of the loop; the actor re-sends
/// `Poll` to itself until the bot is stopped or deregistered.
pub struct BotActor;

impl Actor for BotActor {
    type Msg = BotMessage;
    type State = BotActorState;
    type Arguments = BotArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting bot: {}", args.bot.id());

        myself.send_message(BotMessage::Poll)?;

        Ok(BotActorState {
            bot: args.bot,
            controller: args.controller,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            BotMessage::Poll => {
                if state.bot.stop_requested() {
                    myself.stop(None);
                    return Ok(());
                }

                let Some(controller) = state.controller.upgrade() else {
                    tracing::debug!("Controller for bot {} dropped", state.bot.id());
                    myself.stop(None);
                    return Ok(());
                };

                match controller.take_next(state.bot.id()).await {
                    Assignment::Withdrawn => {
                        tracing::debug!("Bot {} no longer registered", state.bot.id());
                        myself.stop(None);
                        return Ok(());
                    }
                    Assignment::Idle => {
                        tokio::select! {
                            _ = state.bot.stopped() => {
                                myself.stop(None);
                                return Ok(());
                            }
                            _ = controller.wait_for_work() => {}
                        }
                    }
                    Assignment::Order(order_id) => {
                        controller.run_order(&state.bot, order_id).await;
                    }
                }

                myself.send_message(BotMessage::Poll)?;
            }
        }

        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        // Lets holders of the bot handle see that its loop is gone.
        state.bot.request_stop();
        tracing::info!("Bot {} stopped", state.bot.id());
        Ok(())
    }
}

/// Spawn the pull-loop actor for `bot`.
pub(crate) async fn spawn_bot_actor(
    controller: WeakController,
    bot: Bot,
) -> Result<ActorRef<BotMessage>, ractor::SpawnErr> {
    let (actor, _handle) = Actor::spawn(None, BotActor, BotArgs { bot, controller }).await?;
    Ok(actor)
}
