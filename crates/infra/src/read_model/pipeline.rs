//! Dashboard pipeline summary.

use serde::{Deserialize, Serialize};

use dealroom_negotiation::{DealStatus, Lead, Money};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineBucket {
    pub count: usize,
    pub total: Money,
}

impl PipelineBucket {
    fn add(&mut self, amount: Money) {
        self.count += 1;
        self.total = Money::saturating_sum([self.total, amount]);
    }
}

/// Three headline figures for a set of leads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Sold leads, valued at their sale price.
    pub closed_deals: PipelineBucket,
    /// Leads with an open offer or counter, valued at the latest offer.
    pub pending_offers: PipelineBucket,
    /// Every lead, valued at its asking price.
    pub all_leads: PipelineBucket,
}

impl PipelineSummary {
    pub fn from_leads<'a, I>(leads: I) -> Self
    where
        I: IntoIterator<Item = &'a Lead>,
    {
        let mut summary = Self::default();

        for lead in leads {
            summary.all_leads.add(lead.asking_price());

            match lead.status() {
                DealStatus::Sold => {
                    summary.closed_deals.add(lead.sold_for().unwrap_or_default());
                }
                DealStatus::OfferMade | DealStatus::Countered => {
                    let latest = lead
                        .history()
                        .last_event()
                        .map(|e| e.amount)
                        .unwrap_or(lead.asking_price());
                    summary.pending_offers.add(latest);
                }
                _ => {}
            }
        }

        summary
    }
}
