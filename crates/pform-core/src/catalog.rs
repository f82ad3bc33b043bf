//! # Reference Catalogs
//!
//! Static breach and penalty lists, built once on first use and shared by
//! every request. The lists are a closed enumeration of the association
//! regulation: adding or removing an entry is a code change.
//!
//! Two profiles exist and are kept apart on purpose:
//!
//! - [`CatalogProfile::Escalation`]: each [`Breach`] carries its base fine
//!   and regulation reference; the fine escalates with the occurrence count.
//! - [`CatalogProfile::Tier`]: each [`TierBreach`] is only an id, code and
//!   description; the fine is a [`Penalty`] tier picked by the user.
//!
//! Declaration order is display order.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::Amount;
use crate::calculator::OccurrenceCount;

/// Which catalog and submission shape the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogProfile {
    /// Breaches with base fines, escalated by occurrence count.
    #[default]
    Escalation,
    /// Breaches paired with a fixed penalty tier.
    Tier,
}

impl CatalogProfile {
    /// Profile name as used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Escalation => "escalation",
            Self::Tier => "tier",
        }
    }
}

impl fmt::Display for CatalogProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A profile name that is neither `escalation` nor `tier`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown catalog profile \"{0}\" (expected \"escalation\" or \"tier\")")]
pub struct UnknownProfile(String);

impl FromStr for CatalogProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "escalation" => Ok(Self::Escalation),
            "tier" => Ok(Self::Tier),
            _ => Err(UnknownProfile(s.to_string())),
        }
    }
}

/// A breach of the regulation with its base fine (escalation profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breach {
    /// Stable numeric identifier.
    pub id: u64,
    /// Short code, e.g. `B5.3.1`.
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Fine for a first occurrence.
    pub base_amount: Amount,
    /// Article of the regulation the breach falls under.
    pub regulation_reference: &'static str,
}

/// A breach without an attached fine (tier profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBreach {
    /// Stable numeric identifier.
    pub id: u64,
    /// Short code, e.g. `B5.3.1`.
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// A fixed-amount fine bracket (tier profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    /// Stable numeric identifier.
    pub id: u64,
    /// Short code, e.g. `P2`.
    pub code: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Fine charged for this tier.
    pub amount: Amount,
}

// (id, code, description, base fine, regulation reference)
const BREACH_TABLE: &[(u64, &str, &str, u32, &str)] = &[
    // 5.1. Common areas and safety
    (1, "B5.1.1", "Utilizarea neautorizată a înregistrărilor video", 1000, "5.1.1"),
    (2, "B5.1.2", "Depășirea vitezei sau claxonatul nejustificat", 500, "5.1.2"),
    (3, "B5.1.3", "Depozitarea substanțelor periculoase", 1500, "5.1.3"),
    (4, "B5.1.4", "Lansarea focului de artificii", 600, "5.1.4"),
    (5, "B5.1.5", "Intervenția neautorizată asupra instalațiilor inginerești", 1000, "5.1.5"),
    (6, "B5.1.6", "Organizarea comerțului stradal neautorizat", 1000, "5.1.6"),
    // 5.2. Pets
    (7, "B5.2.1", "Omiterea colectării dejecțiilor animale", 500, "5.2.1"),
    // 5.3. Cleanliness and waste
    (8, "B5.3.1", "Aruncarea gunoiului menajer în locuri neamenajate", 1000, "5.3.1"),
    (9, "B5.3.2", "Aruncarea gunoaielor în spațiile comune", 1500, "5.3.2"),
    (10, "B5.3.3", "Lăsarea pungilor cu gunoi menajer pe coridor", 1500, "5.3.3"),
    (11, "B5.3.4", "Aruncarea țigărilor în afara urnelor de gunoi", 1000, "5.3.4"),
    (12, "B5.3.5", "Evacuarea deșeurilor nepermise în sistemul de canalizare", 1500, "5.3.5"),
    (13, "B5.3.6a", "Aruncarea gunoiului nemenajer în tomberoane", 1500, "5.3.6"),
    (14, "B5.3.6b", "Aruncarea gunoiului nemenajer (volum mare)", 2500, "5.3.6"),
    (15, "B5.3.7", "Exercitarea necesităților fiziologice în zone interzise", 2000, "5.3.7"),
    // 5.4. Smoking
    (16, "B5.4.1", "Fumatul în zonele interzise", 2000, "5.4.1"),
    // 5.5. Noise
    (17, "B5.5.1", "Tulburarea liniștii în timpul nopții", 1000, "5.5.1"),
    (18, "B5.5.2", "Efectuarea lucrărilor cu zgomot în afara orelor permise", 1000, "5.5.2"),
    // 5.6. Elevators
    (19, "B5.6.1", "Folosirea lifturilor mici pentru materiale de construcție", 2500, "5.6.1"),
    // 5.7. Facade
    (20, "B5.7.1", "Instalarea tijelor pentru uscarea rufelor", 2500, "5.7.1"),
    (21, "B5.7.2", "Instalarea neautorizată a antenelor", 2500, "5.7.2"),
    (22, "B5.7.3", "Montarea aparatelor de climatizare cu traseu vizibil", 2500, "5.7.3"),
    (23, "B5.7.4", "Montarea plaselor pentru insecte de culoare nepermisă", 1000, "5.7.4"),
    (24, "B5.7.5", "Instalarea neautorizată de obiecte pe fațadă", 2500, "5.7.5"),
    // 5.8. Parking
    (25, "B5.8.1", "Parcarea în afara locurilor amenajate", 500, "5.8.1"),
    (26, "B5.8.2", "Parcarea peste marcajul rutier", 500, "5.8.2"),
    (27, "B5.8.3", "Parcarea îndelungată (peste 3 săptămâni)", 750, "5.8.3"),
    (28, "B5.8.4", "Parcarea pe capacele de canalizare/apeduct", 500, "5.8.4"),
    (29, "B5.8.5", "Parcarea blocând accesul", 1000, "5.8.5"),
    (30, "B5.8.6", "Scurgeri de uleiuri/lichide din automobil", 1000, "5.8.6"),
    // 5.9. Renovation works
    (31, "B5.9.3", "Utilizarea liftului de pasageri pentru materiale de construcție", 2500, "5.9.3"),
    (32, "B5.9.4", "Depozitarea materialelor/deșeurilor în LUC", 1500, "5.9.4"),
    (33, "B5.9.5", "Nesalubrizarea în urma transportării materialelor", 1500, "5.9.5"),
    (34, "B5.9.6", "Afectarea integrității/rezistenței blocului", 7500, "5.9.6"),
    (35, "B5.9.8", "Conectarea hotelor în canalul de ventilare comun", 2500, "5.9.8"),
];

// (id, code, description, amount)
const PENALTY_TABLE: &[(u64, &str, &str, u32)] = &[
    (1, "P0", "Avertisment scris", 0),
    (2, "P1", "Amendă minoră", 500),
    (3, "P2", "Amendă moderată", 1000),
    (4, "P3", "Amendă medie", 1500),
    (5, "P4", "Amendă majoră", 2500),
    (6, "P5", "Amendă gravă", 5000),
    (7, "P6", "Amendă foarte gravă", 7500),
];

fn escalation_breaches() -> &'static [Breach] {
    static BREACHES: OnceLock<Vec<Breach>> = OnceLock::new();
    BREACHES.get_or_init(|| {
        BREACH_TABLE
            .iter()
            .map(|&(id, code, description, base, reference)| Breach {
                id,
                code,
                description,
                base_amount: Amount::from_whole(base),
                regulation_reference: reference,
            })
            .collect()
    })
}

fn tier_breaches() -> &'static [TierBreach] {
    static BREACHES: OnceLock<Vec<TierBreach>> = OnceLock::new();
    BREACHES.get_or_init(|| {
        BREACH_TABLE
            .iter()
            .map(|&(id, code, description, _, _)| TierBreach {
                id,
                code,
                description,
            })
            .collect()
    })
}

fn penalty_tiers() -> &'static [Penalty] {
    static PENALTIES: OnceLock<Vec<Penalty>> = OnceLock::new();
    PENALTIES.get_or_init(|| {
        PENALTY_TABLE
            .iter()
            .map(|&(id, code, description, amount)| Penalty {
                id,
                code,
                description,
                amount: Amount::from_whole(amount),
            })
            .collect()
    })
}

/// Read-only view of the catalog for one profile.
///
/// Cheap to copy; the underlying lists are process-wide statics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Catalog {
    profile: CatalogProfile,
}

impl Catalog {
    /// Catalog for the given profile.
    pub fn new(profile: CatalogProfile) -> Self {
        Self { profile }
    }

    /// The active profile.
    pub fn profile(&self) -> CatalogProfile {
        self.profile
    }

    /// Breaches with base fines. Only populated for the escalation profile.
    pub fn breaches(&self) -> &'static [Breach] {
        match self.profile {
            CatalogProfile::Escalation => escalation_breaches(),
            CatalogProfile::Tier => &[],
        }
    }

    /// Breaches without fines. Only populated for the tier profile.
    pub fn tier_breaches(&self) -> &'static [TierBreach] {
        match self.profile {
            CatalogProfile::Escalation => &[],
            CatalogProfile::Tier => tier_breaches(),
        }
    }

    /// Penalty tiers, or `None` when the profile has none.
    pub fn penalties(&self) -> Option<&'static [Penalty]> {
        match self.profile {
            CatalogProfile::Escalation => None,
            CatalogProfile::Tier => Some(penalty_tiers()),
        }
    }

    /// Selectable occurrence counts, or `None` when the profile has none.
    pub fn occurrences(&self) -> Option<&'static [u32]> {
        match self.profile {
            CatalogProfile::Escalation => Some(&OccurrenceCount::SELECTABLE),
            CatalogProfile::Tier => None,
        }
    }

    /// Look up an escalation breach by id.
    pub fn breach(&self, id: u64) -> Option<&'static Breach> {
        self.breaches().iter().find(|b| b.id == id)
    }

    /// Look up a tier breach by id.
    pub fn tier_breach(&self, id: u64) -> Option<&'static TierBreach> {
        self.tier_breaches().iter().find(|b| b.id == id)
    }

    /// Look up a penalty tier by id.
    pub fn penalty(&self, id: u64) -> Option<&'static Penalty> {
        self.penalties()?.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn escalation_catalog_has_all_breaches_in_order() {
        let catalog = Catalog::new(CatalogProfile::Escalation);
        let ids: Vec<u64> = catalog.breaches().iter().map(|b| b.id).collect();
        assert_eq!(ids, (1..=35).collect::<Vec<_>>());
        assert!(catalog.tier_breaches().is_empty());
    }

    #[test]
    fn listing_is_stable_across_calls() {
        let catalog = Catalog::default();
        let first = catalog.breaches();
        let second = catalog.breaches();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, second);
    }

    #[test]
    fn breach_eight_has_base_one_thousand() {
        let breach = Catalog::default().breach(8).unwrap();
        assert_eq!(breach.code, "B5.3.1");
        assert_eq!(breach.base_amount, Amount::from_whole(1000));
        assert_eq!(breach.regulation_reference, "5.3.1");
    }

    #[test]
    fn codes_and_ids_are_unique() {
        let breaches = Catalog::default().breaches();
        let ids: HashSet<_> = breaches.iter().map(|b| b.id).collect();
        let codes: HashSet<_> = breaches.iter().map(|b| b.code).collect();
        assert_eq!(ids.len(), breaches.len());
        assert_eq!(codes.len(), breaches.len());
    }

    #[test]
    fn tier_catalog_mirrors_breach_codes() {
        let tier = Catalog::new(CatalogProfile::Tier);
        assert!(tier.breaches().is_empty());
        assert_eq!(tier.tier_breaches().len(), BREACH_TABLE.len());
        assert_eq!(tier.tier_breach(14).unwrap().code, "B5.3.6b");
    }

    #[test]
    fn penalties_only_in_tier_profile() {
        assert!(Catalog::new(CatalogProfile::Escalation).penalties().is_none());
        let tiers = Catalog::new(CatalogProfile::Tier).penalties().unwrap();
        assert_eq!(tiers.first().unwrap().amount, Amount::ZERO);
        assert!(tiers.windows(2).all(|w| w[0].amount < w[1].amount));
    }

    #[test]
    fn occurrences_only_in_escalation_profile() {
        assert_eq!(
            Catalog::new(CatalogProfile::Escalation).occurrences(),
            Some(&[1u32, 2, 3, 4, 5][..])
        );
        assert!(Catalog::new(CatalogProfile::Tier).occurrences().is_none());
    }

    #[test]
    fn unknown_ids_are_none() {
        let catalog = Catalog::default();
        assert!(catalog.breach(0).is_none());
        assert!(catalog.breach(36).is_none());
        assert!(catalog.penalty(1).is_none());
    }

    #[test]
    fn profile_parses_case_insensitively() {
        assert_eq!("TIER".parse::<CatalogProfile>(), Ok(CatalogProfile::Tier));
        assert_eq!(
            " escalation ".parse::<CatalogProfile>(),
            Ok(CatalogProfile::Escalation)
        );
        assert!("fixed".parse::<CatalogProfile>().is_err());
    }

    #[test]
    fn breach_serializes_camel_case() {
        let json = serde_json::to_value(Catalog::default().breach(1).unwrap()).unwrap();
        assert_eq!(json["baseAmount"], 1000.0);
        assert_eq!(json["regulationReference"], "5.1.1");
    }
}
