use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Inventory, ItemId, PartnerShare, ProfitSplit};

/// Accumulated profit and how it divides between the two partners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub share: PartnerShare,
    pub total_profit: Amount,
    pub split: ProfitSplit,
    pub items: Vec<ItemProfit>,
}

/// One item's contribution to the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemProfit {
    pub id: ItemId,
    pub name: String,
    pub sold: u32,
    pub total_profit: Amount,
    pub split: ProfitSplit,
}

impl ProfitSummary {
    pub fn build(inventory: &Inventory, share: PartnerShare) -> Self {
        let items = inventory
            .items()
            .iter()
            .map(|item| ItemProfit {
                id: item.id,
                name: item.name.clone(),
                sold: item.sold,
                total_profit: item.total_profit,
                split: share.split(item.total_profit),
            })
            .collect();

        let total_profit = inventory.total_profit();
        Self {
            share,
            total_profit,
            split: share.split(total_profit),
            items,
        }
    }
}
