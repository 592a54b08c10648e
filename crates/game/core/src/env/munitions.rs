use crate::effects::MunitionProfile;
use crate::state::AmmoId;

/// Static munition catalog.
pub trait MunitionOracle: Send + Sync {
    fn munition(&self, id: AmmoId) -> Option<MunitionProfile>;
}

impl MunitionOracle for [MunitionProfile] {
    fn munition(&self, id: AmmoId) -> Option<MunitionProfile> {
        self.iter().find(|profile| profile.id == id).cloned()
    }
}

impl MunitionOracle for Vec<MunitionProfile> {
    fn munition(&self, id: AmmoId) -> Option<MunitionProfile> {
        self.as_slice().munition(id)
    }
}
