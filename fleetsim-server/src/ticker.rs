//! The task that owns the simulation and advances it on a timer

use std::{sync::Arc, time::Duration};

use fleetsim_core::prelude::*;
use tokio::{
    sync::{RwLock, mpsc, oneshot},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::api::ApiError;

enum FleetCommand {
    Reset {
        vehicle_id: String,
        reply: oneshot::Sender<Result<VehicleSnapshot, Error>>,
    },
}

/// Cheap handle to the published fleet state.
///
/// Readers clone the current `Arc`; writes are sent to the ticker task,
/// which is the only owner of the simulation.
#[derive(Clone)]
pub struct FleetHandle {
    current: Arc<RwLock<Arc<FleetState>>>,
    commands: mpsc::Sender<FleetCommand>,
}

impl FleetHandle {
    pub async fn current(&self) -> Arc<FleetState> {
        Arc::clone(&*self.current.read().await)
    }

    /// Put a vehicle back at the start of its route
    pub async fn reset(&self, vehicle_id: &str) -> Result<VehicleSnapshot, ApiError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(FleetCommand::Reset {
                vehicle_id: vehicle_id.to_string(),
                reply,
            })
            .await
            .map_err(|_| ApiError::Unavailable)?;
        Ok(response.await.map_err(|_| ApiError::Unavailable)??)
    }
}

/// Spawn the ticker. It stops once every `FleetHandle` is dropped.
pub fn spawn_ticker<R>(simulation: Simulation<R>, period: Duration) -> (FleetHandle, JoinHandle<()>)
where
    R: RandomSource + Send + 'static,
{
    let current = Arc::new(RwLock::new(Arc::new(simulation.state().clone())));
    let (commands, receiver) = mpsc::channel(32);
    let task = tokio::spawn(run(simulation, period, Arc::clone(&current), receiver));
    (FleetHandle { current, commands }, task)
}

async fn run<R: RandomSource>(
    mut simulation: Simulation<R>,
    period: Duration,
    current: Arc<RwLock<Arc<FleetState>>>,
    mut commands: mpsc::Receiver<FleetCommand>,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(
        "Ticker started: {} vehicles, one tick every {:?}",
        simulation.state().len(),
        period
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = simulation.step().clone();
                debug!(tick = state.tick(), clock = %state.clock(), "Fleet advanced");
                *current.write().await = Arc::new(state);
            }
            command = commands.recv() => match command {
                Some(FleetCommand::Reset { vehicle_id, reply }) => {
                    let outcome = match simulation.reset_vehicle(&vehicle_id) {
                        Ok(state) => {
                            let state = state.clone();
                            let snapshot = state
                                .vehicle_snapshot(&vehicle_id)
                                .ok_or_else(|| Error::UnknownVehicle(vehicle_id.clone()));
                            *current.write().await = Arc::new(state);
                            snapshot
                        }
                        Err(e) => Err(e),
                    };
                    // the requester may have gone away
                    let _ = reply.send(outcome);
                }
                None => break,
            }
        }
    }
    info!("Ticker stopped at tick {}", simulation.state().tick());
}
