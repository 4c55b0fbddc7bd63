/// Outcome of offering a key to a component.
///
/// Components see keys before their view does; `NotHandled` passes the key
/// on to the next handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the parent to do
  Handled,
  /// Key was consumed and produced an event for the parent
  Event(T),
  /// Key was not consumed
  NotHandled,
}
