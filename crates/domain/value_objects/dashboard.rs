use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserCountsModel {
    pub total: i64,
    pub clients: i64,
    pub providers: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MissionCountsModel {
    pub total: i64,
    pub pending: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenueModel {
    pub total_commission: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardStatsModel {
    pub users: UserCountsModel,
    pub missions: MissionCountsModel,
    pub revenue: RevenueModel,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequestModel {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaginationModel {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl PaginationModel {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            total,
            page,
            limit,
            total_pages,
        }
    }
}
