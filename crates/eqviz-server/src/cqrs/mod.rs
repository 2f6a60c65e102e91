pub use mediator::DefaultAsyncMediator;

use crate::features::FeatureState;

pub type AppMediator = DefaultAsyncMediator;

pub fn build_mediator(state: FeatureState) -> AppMediator {
    DefaultAsyncMediator::builder()
        // Datasets
        .add_handler({
            let state = state.clone();
            move |cmd| {
                let state = state.clone();
                async move { crate::features::datasets::commands::upload::handle(state, cmd).await }
            }
        })
        .add_handler({
            let state = state.clone();
            move |query| {
                let state = state.clone();
                async move { crate::features::datasets::queries::history::handle(state, query).await }
            }
        })
        .add_handler({
            let state = state.clone();
            move |query| {
                let state = state.clone();
                async move { crate::features::datasets::queries::summary::handle(state, query).await }
            }
        })
        .add_handler({
            let state = state.clone();
            move |query| {
                let state = state.clone();
                async move { crate::features::datasets::queries::report::handle(state, query).await }
            }
        })
        .build()
}
