pub(crate) mod handle_trigger_event;

pub use handle_trigger_event::HandleTriggerEventInterface;

#[cfg(any(test, feature = "testkit"))]
pub use self::handle_trigger_event::MockHandleTriggerEventInterface;
