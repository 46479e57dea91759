/// Outcome of offering a key to a component.
///
/// Components return this to the app so overlays can be stacked: the first
/// component that reports anything other than `NotHandled` owns the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the app to do
  Handled,
  /// Key was consumed and produced an event for the app
  Event(T),
  /// Key was not consumed, try the next handler
  NotHandled,
}
