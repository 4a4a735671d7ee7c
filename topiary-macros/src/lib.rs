//! Procedural macros for Topiary.

use proc_macro::TokenStream;

mod topic;

/// Declare a function as the handler for a topic path.
///
/// The function is turned into a unit struct implementing `Handler` and
/// registered with `inventory`. Hubs built with
/// `Hub::builder().collect_registered()` subscribe it automatically.
///
/// The function takes one `&Delivery<'_>` and may return anything that
/// implements `IntoOutcome`.
///
/// # Usage
///
/// ```rust,ignore
/// #[topiary::topic("orders:created")]
/// fn audit(delivery: &Delivery<'_>) {
///     println!("{}", delivery.full_path());
/// }
///
/// // With a name for log events
/// #[topiary::topic("orders", name = "order-guard")]
/// fn guard(delivery: &Delivery<'_>) -> bool {
///     delivery.get("order_id").is_some()
/// }
/// ```
#[proc_macro_attribute]
pub fn topic(attr: TokenStream, item: TokenStream) -> TokenStream {
    topic::topic_impl(attr, item)
}
