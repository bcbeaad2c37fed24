//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// The block is moved into the future, so clone any `Arc` collaborators
/// before invoking the macro.
///
/// # Example
///
/// ```rust,ignore
/// use booking_core::async_effect;
///
/// let directory = Arc::clone(&env.directory);
/// async_effect! {
///     match directory.list_providers().await {
///         Ok(providers) => Some(WizardAction::ProvidersLoaded { providers }),
///         Err(error) => Some(WizardAction::CatalogLoadFailed { error: error.into() }),
///     }
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create a fire-and-forget `Effect::Future` that never feeds an action back
///
/// # Example
///
/// ```rust,ignore
/// use booking_core::detached_effect;
///
/// let sink = Arc::clone(&env.tracking);
/// detached_effect! {
///     let _ = sink.record_event("date_selected", payload).await;
/// }
/// ```
#[macro_export]
macro_rules! detached_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move {
                $($body)*
                ::std::option::Option::None
            })
        )
    };
}
