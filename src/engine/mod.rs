use tracing::{debug, error, info};

use crate::{
    geo::Coordinate,
    geolocation::{fetch_current_location, GeolocationProvider},
    locations::generate_locations,
    rng::RngManager,
    state::{AppState, Transition},
};

pub struct EngineSettings {
    /// Master seed; drawn from entropy when `None`.
    pub seed: Option<u64>,
}

pub struct EngineBuilder {
    settings: EngineSettings,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn build(self) -> Engine {
        let rng = match self.settings.seed {
            Some(seed) => RngManager::new(seed),
            None => RngManager::from_entropy(),
        };
        info!(seed = rng.master_seed(), "location engine ready");
        Engine { rng }
    }
}

/// Turns position requests into state transitions.
pub struct Engine {
    rng: RngManager,
}

impl Engine {
    pub fn seed(&self) -> u64 {
        self.rng.master_seed()
    }

    /// Fresh batch of ATMs around `center`.
    pub fn generate(&mut self, center: Coordinate) -> Transition {
        let mut stream = self.rng.next_stream();
        let locations = generate_locations(center, &mut stream);
        debug!(?center, ?locations, "generated locations");
        Transition::LocationsGenerated(locations)
    }

    /// Asks `provider` for the position once and derives the follow-up
    /// transitions. A failed request leaves the list empty.
    pub async fn locate<P>(&mut self, provider: &P) -> Vec<Transition>
    where
        P: GeolocationProvider + ?Sized,
    {
        match fetch_current_location(provider).await {
            Ok(center) => {
                info!(lat = center.latitude, lng = center.longitude, "position acquired");
                let generated = self.generate(center);
                vec![Transition::FetchCompleted(Some(center)), generated]
            }
            Err(err) => {
                error!("{err}");
                vec![Transition::FetchCompleted(None)]
            }
        }
    }

    pub async fn run<P>(&mut self, state: &mut AppState, provider: &P)
    where
        P: GeolocationProvider + ?Sized,
    {
        self.run_with_hook(state, provider, |_| {}).await
    }

    /// Like [`Engine::run`], calling `hook` after every applied transition.
    pub async fn run_with_hook<P, F>(&mut self, state: &mut AppState, provider: &P, mut hook: F)
    where
        P: GeolocationProvider + ?Sized,
        F: FnMut(&AppState),
    {
        for transition in self.locate(provider).await {
            state.apply(transition);
            hook(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::StaticGeolocation;

    fn engine(seed: u64) -> Engine {
        EngineBuilder::new(EngineSettings { seed: Some(seed) }).build()
    }

    #[test]
    fn seeded_engines_generate_identical_batches() {
        let center = Coordinate::new(12.9716, 77.5946);
        assert_eq!(engine(5).generate(center), engine(5).generate(center));
    }

    #[test]
    fn regeneration_uses_a_new_stream() {
        let center = Coordinate::new(12.9716, 77.5946);
        let mut engine = engine(5);
        let first = engine.generate(center);
        let second = engine.generate(center);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn run_fills_state() {
        let center = Coordinate::new(12.9716, 77.5946);
        let mut state = AppState::new();
        engine(1)
            .run(&mut state, &StaticGeolocation::new(center))
            .await;
        assert!(state.fetch_tried);
        assert_eq!(state.center, Some(center));
        assert_eq!(state.locations.len(), 10);
    }
}
