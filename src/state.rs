use crate::{
    db::DbPool,
    queries::{AccountQueries, ReceiptQueries, RideQueries},
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountQueries,
    pub rides: RideQueries,
    pub receipts: ReceiptQueries,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        Self {
            accounts: AccountQueries::new(db.clone()),
            rides: RideQueries::new(db.clone()),
            receipts: ReceiptQueries::new(db),
        }
    }
}
