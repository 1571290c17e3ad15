use serde::{Deserialize, Serialize};

/// Who supplies a component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SupplyParty {
    Customer,
    Halagel,
}

impl SupplyParty {
    pub const ALL: [SupplyParty; 2] = [SupplyParty::Customer, SupplyParty::Halagel];

    pub fn label(self) -> &'static str {
        match self {
            SupplyParty::Customer => "Customer",
            SupplyParty::Halagel => "Halagel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplyItem {
    RawMaterial,
    Bottle,
    Labeling,
    InnerBox,
    Cap,
    CapSeal,
    Stopper,
    PvcFoil,
    AlumFoil,
    Shrinkwrap,
    Carton,
    Insert,
    Others,
}

impl SupplyItem {
    /// Requirement rows in printed order, Others last.
    pub const ALL: [SupplyItem; 13] = [
        SupplyItem::RawMaterial,
        SupplyItem::Bottle,
        SupplyItem::Labeling,
        SupplyItem::InnerBox,
        SupplyItem::Cap,
        SupplyItem::CapSeal,
        SupplyItem::Stopper,
        SupplyItem::PvcFoil,
        SupplyItem::AlumFoil,
        SupplyItem::Shrinkwrap,
        SupplyItem::Carton,
        SupplyItem::Insert,
        SupplyItem::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SupplyItem::RawMaterial => "RAW MATERIAL:",
            SupplyItem::Bottle => "BOTTLE:",
            SupplyItem::Labeling => "LABELLING:",
            SupplyItem::InnerBox => "INNER BOX:",
            SupplyItem::Cap => "CAP:",
            SupplyItem::CapSeal => "CAP SEAL:",
            SupplyItem::Stopper => "STOPPER:",
            SupplyItem::PvcFoil => "PVC FOIL:",
            SupplyItem::AlumFoil => "ALUMINIUM FOIL:",
            SupplyItem::Shrinkwrap => "PVC SHRINKWRAP:",
            SupplyItem::Carton => "CARTON:",
            SupplyItem::Insert => "INSERT:",
            SupplyItem::Others => "OTHERS :",
        }
    }
}

/// Per-item supplier choice. Each slot holds at most one party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplySource {
    pub raw_material: Option<SupplyParty>,
    pub bottle: Option<SupplyParty>,
    pub labeling: Option<SupplyParty>,
    pub inner_box: Option<SupplyParty>,
    pub cap: Option<SupplyParty>,
    pub cap_seal: Option<SupplyParty>,
    pub stopper: Option<SupplyParty>,
    pub pvc_foil: Option<SupplyParty>,
    pub alum_foil: Option<SupplyParty>,
    pub shrinkwrap: Option<SupplyParty>,
    pub carton: Option<SupplyParty>,
    pub insert: Option<SupplyParty>,
    pub others: Option<SupplyParty>,
}

impl SupplySource {
    fn slot(&mut self, item: SupplyItem) -> &mut Option<SupplyParty> {
        match item {
            SupplyItem::RawMaterial => &mut self.raw_material,
            SupplyItem::Bottle => &mut self.bottle,
            SupplyItem::Labeling => &mut self.labeling,
            SupplyItem::InnerBox => &mut self.inner_box,
            SupplyItem::Cap => &mut self.cap,
            SupplyItem::CapSeal => &mut self.cap_seal,
            SupplyItem::Stopper => &mut self.stopper,
            SupplyItem::PvcFoil => &mut self.pvc_foil,
            SupplyItem::AlumFoil => &mut self.alum_foil,
            SupplyItem::Shrinkwrap => &mut self.shrinkwrap,
            SupplyItem::Carton => &mut self.carton,
            SupplyItem::Insert => &mut self.insert,
            SupplyItem::Others => &mut self.others,
        }
    }

    pub fn get(&self, item: SupplyItem) -> Option<SupplyParty> {
        match item {
            SupplyItem::RawMaterial => self.raw_material,
            SupplyItem::Bottle => self.bottle,
            SupplyItem::Labeling => self.labeling,
            SupplyItem::InnerBox => self.inner_box,
            SupplyItem::Cap => self.cap,
            SupplyItem::CapSeal => self.cap_seal,
            SupplyItem::Stopper => self.stopper,
            SupplyItem::PvcFoil => self.pvc_foil,
            SupplyItem::AlumFoil => self.alum_foil,
            SupplyItem::Shrinkwrap => self.shrinkwrap,
            SupplyItem::Carton => self.carton,
            SupplyItem::Insert => self.insert,
            SupplyItem::Others => self.others,
        }
    }

    pub fn set(&mut self, item: SupplyItem, party: Option<SupplyParty>) {
        *self.slot(item) = party;
    }

    /// Radio-button selection: picking the active party clears the slot,
    /// picking the other party replaces it.
    pub fn toggle(&mut self, item: SupplyItem, party: SupplyParty) {
        let slot = self.slot(item);
        *slot = if *slot == Some(party) { None } else { Some(party) };
    }

    pub fn clear(&mut self, item: SupplyItem) {
        *self.slot(item) = None;
    }

    pub fn is_empty(&self) -> bool {
        SupplyItem::ALL.iter().all(|item| self.get(*item).is_none())
    }
}
