//! Validador de transiciones de estado
//!
//! Cada tipo de entidad tiene una tabla de adyacencia fija: para cada estado,
//! el conjunto de estados destino permitidos. La validación es pura, sin I/O.
//!
//! Una transición al mismo estado siempre es válida (no-op idempotente).
//! El paso a SUSPENDED de un conductor se permite desde cualquier estado; se
//! comprueba antes de consultar la tabla y no figura como arista en ella.

use crate::models::{DriverStatus, EntityKind, TripStatus, VehicleStatus};
use crate::utils::errors::{transition_rejected, AppResult};
use std::fmt::{Debug, Display};

/// Definición inmutable de una máquina de estados
#[derive(Debug)]
pub struct TransitionTable<S: 'static> {
    entity: EntityKind,
    edges: &'static [(S, &'static [S])],
}

impl<S: 'static> TransitionTable<S> {
    pub const fn new(entity: EntityKind, edges: &'static [(S, &'static [S])]) -> Self {
        Self { entity, edges }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }
}

impl<S: Copy + PartialEq + 'static> TransitionTable<S> {
    /// Estados destino permitidos desde `from` (vacío si `from` es terminal)
    pub fn allowed_targets(&self, from: S) -> &'static [S] {
        self.edges
            .iter()
            .find(|(state, _)| *state == from)
            .map(|(_, targets)| *targets)
            .unwrap_or(&[])
    }

    pub fn can_transition(&self, from: S, to: S) -> bool {
        from == to || self.allowed_targets(from).contains(&to)
    }

    pub fn is_terminal(&self, state: S) -> bool {
        self.allowed_targets(state).is_empty()
    }
}

pub static VEHICLE_TRANSITIONS: TransitionTable<VehicleStatus> = TransitionTable::new(
    EntityKind::Vehicle,
    &[
        (
            VehicleStatus::Available,
            &[VehicleStatus::OnTrip, VehicleStatus::InShop, VehicleStatus::Retired],
        ),
        (VehicleStatus::OnTrip, &[VehicleStatus::Available, VehicleStatus::Retired]),
        (VehicleStatus::InShop, &[VehicleStatus::Available, VehicleStatus::Retired]),
        (VehicleStatus::Retired, &[]),
    ],
);

pub static DRIVER_TRANSITIONS: TransitionTable<DriverStatus> = TransitionTable::new(
    EntityKind::Driver,
    &[
        (
            DriverStatus::OnDuty,
            &[DriverStatus::OnTrip, DriverStatus::OffDuty, DriverStatus::Suspended],
        ),
        (DriverStatus::OffDuty, &[DriverStatus::OnDuty, DriverStatus::Suspended]),
        (DriverStatus::OnTrip, &[DriverStatus::OnDuty, DriverStatus::Suspended]),
        (DriverStatus::Suspended, &[DriverStatus::OnDuty, DriverStatus::OffDuty]),
    ],
);

pub static TRIP_TRANSITIONS: TransitionTable<TripStatus> = TransitionTable::new(
    EntityKind::Trip,
    &[
        (TripStatus::Draft, &[TripStatus::Dispatched, TripStatus::Cancelled]),
        (
            TripStatus::Dispatched,
            &[TripStatus::OnTrip, TripStatus::Completed, TripStatus::Cancelled],
        ),
        (TripStatus::OnTrip, &[TripStatus::Completed, TripStatus::Cancelled]),
        (TripStatus::Completed, &[]),
        (TripStatus::Cancelled, &[]),
    ],
);

/// Estado de ciclo de vida con su tabla de transiciones
pub trait LifecycleStatus: Copy + PartialEq + Debug + Display + 'static {
    fn transitions() -> &'static TransitionTable<Self>;

    fn can_transition_to(self, target: Self) -> bool {
        Self::transitions().can_transition(self, target)
    }

    /// Validar la transición, devolviendo `StateTransitionRejected` si no es legal
    fn ensure_transition(self, target: Self) -> AppResult<()> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(transition_rejected(Self::transitions().entity(), self, target))
        }
    }
}

impl LifecycleStatus for VehicleStatus {
    fn transitions() -> &'static TransitionTable<Self> {
        &VEHICLE_TRANSITIONS
    }
}

impl LifecycleStatus for DriverStatus {
    fn transitions() -> &'static TransitionTable<Self> {
        &DRIVER_TRANSITIONS
    }

    fn can_transition_to(self, target: Self) -> bool {
        // Suspensión de seguridad: siempre permitida, sin consultar la tabla
        if target == DriverStatus::Suspended {
            return true;
        }
        DRIVER_TRANSITIONS.can_transition(self, target)
    }
}

impl LifecycleStatus for TripStatus {
    fn transitions() -> &'static TransitionTable<Self> {
        &TRIP_TRANSITIONS
    }
}
