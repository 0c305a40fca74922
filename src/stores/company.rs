use crate::domain::model::{
    Company, Department, Listing, Page, Rank, RankFilter, SelectOption, Staff, StaffFilter,
    UserInfo,
};
use crate::domain::ports::{ApiClient, ApiClientExt};
use crate::utils::error::Result;
use crate::utils::query::{page_count, QueryBuilder};
use std::sync::Arc;

impl StaffFilter {
    pub fn to_query(&self) -> QueryBuilder {
        QueryBuilder::new()
            .param("page", self.page.filter(|p| *p > 0).unwrap_or(1))
            .param("company", self.com.unwrap_or(1))
            .param("department", self.dep.as_deref().unwrap_or_default())
            .param("rank", self.rank.as_deref().unwrap_or_default())
            .param("status", self.sts.as_deref().unwrap_or_default())
            .param("search", self.q.as_deref().unwrap_or_default())
    }
}

impl RankFilter {
    pub fn to_query(&self) -> QueryBuilder {
        QueryBuilder::new()
            .param("page", self.page.filter(|p| *p > 0).unwrap_or(1))
            .param("company", self.com.unwrap_or(1))
            .param("sort", self.sort.as_deref().unwrap_or_default())
            .param("search", self.q.as_deref().unwrap_or_default())
    }
}

/// 部門下拉選單項目，附帶層級
#[derive(Debug, Clone, PartialEq)]
pub struct DepartOption {
    pub value: Option<i64>,
    pub label: String,
    pub level: Option<i64>,
}

/// 本社資訊、職員、職級、部門
pub struct CompanyStore {
    api: Arc<dyn ApiClient>,

    pub company: Option<Company>,
    pub company_list: Vec<Company>,

    pub staff: Option<Staff>,
    pub staff_list: Vec<Staff>,
    pub staffs_count: u64,

    pub rank: Option<Rank>,
    pub rank_list: Vec<Rank>,
    pub all_rank_list: Vec<Rank>,
    pub ranks_count: u64,

    pub department: Option<Department>,
    pub department_list: Vec<Department>,
    pub all_depart_list: Vec<Department>,
    pub departments_count: u64,
}

impl CompanyStore {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            company: None,
            company_list: Vec::new(),
            staff: None,
            staff_list: Vec::new(),
            staffs_count: 0,
            rank: None,
            rank_list: Vec::new(),
            all_rank_list: Vec::new(),
            ranks_count: 0,
            department: None,
            department_list: Vec::new(),
            all_depart_list: Vec::new(),
            departments_count: 0,
        }
    }

    /// 登入者所屬公司，未設定時為 1
    pub fn init_com_id(user: Option<&UserInfo>) -> i64 {
        user.map(UserInfo::company_id).unwrap_or(1)
    }

    // ---- 公司 ----

    pub fn com_select(&self) -> Vec<SelectOption<Option<i64>>> {
        self.company_list
            .iter()
            .map(|c| SelectOption {
                value: c.pk,
                label: c.name.clone(),
            })
            .collect()
    }

    pub async fn fetch_company_list(&mut self) -> Result<()> {
        let list: Listing<Company> = self.api.fetch("/company/").await?;
        self.company_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_company(&mut self, pk: i64) -> Result<()> {
        let company: Company = self.api.fetch(&format!("/company/{}/", pk)).await?;
        self.company = Some(company);
        Ok(())
    }

    pub async fn create_company(&mut self, company: &Company) -> Result<Company> {
        let created: Company = self.api.create("/company/", company).await?;
        self.fetch_company_list().await?;
        self.company = Some(created.clone());
        Ok(created)
    }

    pub async fn update_company(&mut self, pk: i64, company: &Company) -> Result<Company> {
        let updated: Company = self
            .api
            .replace(&format!("/company/{}/", pk), company)
            .await?;
        self.company = Some(updated.clone());
        Ok(updated)
    }

    pub async fn delete_company(&mut self, pk: i64) -> Result<()> {
        self.api.delete(&format!("/company/{}/", pk)).await?;
        self.company = None;
        self.fetch_company_list().await
    }

    // ---- 職員 ----

    pub fn staff_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.staffs_count, items_per_page)
    }

    pub async fn fetch_staff_list(&mut self, filter: &StaffFilter) -> Result<()> {
        let path = filter.to_query().to_path("/staff/");
        let page: Page<Staff> = self.api.fetch(&path).await?;
        self.staff_list = page.results;
        self.staffs_count = page.count;
        Ok(())
    }

    pub async fn fetch_staff(&mut self, pk: i64) -> Result<()> {
        let staff: Staff = self.api.fetch(&format!("/staff/{}/", pk)).await?;
        self.staff = Some(staff);
        Ok(())
    }

    pub async fn create_staff(&mut self, staff: &Staff, page: u64, com: i64) -> Result<Staff> {
        let created: Staff = self.api.create("/staff/", staff).await?;
        self.fetch_staff_list(&StaffFilter {
            page: Some(page),
            com: Some(com),
            ..StaffFilter::default()
        })
        .await?;
        Ok(created)
    }

    pub async fn update_staff(
        &mut self,
        pk: i64,
        staff: &Staff,
        page: u64,
        com: i64,
    ) -> Result<Staff> {
        let updated: Staff = self
            .api
            .replace(&format!("/staff/{}/", pk), staff)
            .await?;
        self.fetch_staff_list(&StaffFilter {
            page: Some(page),
            com: Some(com),
            ..StaffFilter::default()
        })
        .await?;
        Ok(updated)
    }

    pub async fn delete_staff(&mut self, pk: i64, com: i64) -> Result<()> {
        self.api.delete(&format!("/staff/{}/", pk)).await?;
        self.fetch_staff_list(&StaffFilter {
            com: Some(com),
            ..StaffFilter::default()
        })
        .await
    }

    // ---- 職級 ----

    /// 以職級名稱為值（過濾用）
    pub fn rank_names(&self) -> Vec<SelectOption<String>> {
        self.all_rank_list
            .iter()
            .map(|r| SelectOption {
                value: r.rank.clone(),
                label: r.rank.clone(),
            })
            .collect()
    }

    pub fn rank_options(&self) -> Vec<SelectOption<Option<i64>>> {
        self.all_rank_list
            .iter()
            .map(|r| SelectOption {
                value: r.pk,
                label: r.rank.clone(),
            })
            .collect()
    }

    pub fn rank_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.ranks_count, items_per_page)
    }

    pub async fn fetch_rank_list(&mut self, filter: &RankFilter) -> Result<()> {
        let path = filter.to_query().to_path("/rank/");
        let page: Page<Rank> = self.api.fetch(&path).await?;
        self.rank_list = page.results;
        self.ranks_count = page.count;
        Ok(())
    }

    pub async fn fetch_all_rank_list(&mut self, com: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("company", com)
            .to_path("/all-ranks/");
        let list: Listing<Rank> = self.api.fetch(&path).await?;
        self.all_rank_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_rank(&mut self, pk: i64) -> Result<()> {
        let rank: Rank = self.api.fetch(&format!("/rank/{}/", pk)).await?;
        self.rank = Some(rank);
        Ok(())
    }

    pub async fn create_rank(&mut self, rank: &Rank, page: u64, com: i64) -> Result<Rank> {
        let created: Rank = self.api.create("/rank/", rank).await?;
        self.refresh_ranks(page, com).await?;
        Ok(created)
    }

    pub async fn update_rank(&mut self, pk: i64, rank: &Rank, page: u64, com: i64) -> Result<Rank> {
        let updated: Rank = self
            .api
            .replace(&format!("/rank/{}/", pk), rank)
            .await?;
        self.refresh_ranks(page, com).await?;
        Ok(updated)
    }

    pub async fn delete_rank(&mut self, pk: i64, com: i64) -> Result<()> {
        self.api.delete(&format!("/rank/{}/", pk)).await?;
        self.refresh_ranks(1, com).await
    }

    async fn refresh_ranks(&mut self, page: u64, com: i64) -> Result<()> {
        self.fetch_rank_list(&RankFilter {
            page: Some(page),
            com: Some(com),
            ..RankFilter::default()
        })
        .await?;
        self.fetch_all_rank_list(com).await
    }

    // ---- 部門 ----

    pub fn depart_options(&self) -> Vec<DepartOption> {
        self.all_depart_list
            .iter()
            .map(|d| DepartOption {
                value: d.pk,
                label: d.name.clone(),
                level: d.level,
            })
            .collect()
    }

    /// 以部門名稱為值（過濾用）
    pub fn depart_names(&self) -> Vec<SelectOption<String>> {
        self.all_depart_list
            .iter()
            .map(|d| SelectOption {
                value: d.name.clone(),
                label: d.name.clone(),
            })
            .collect()
    }

    pub fn department_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.departments_count, items_per_page)
    }

    pub async fn fetch_department_list(&mut self, page: u64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("page", page.max(1))
            .to_path("/department/");
        let page: Page<Department> = self.api.fetch(&path).await?;
        self.department_list = page.results;
        self.departments_count = page.count;
        Ok(())
    }

    pub async fn fetch_all_depart_list(&mut self, com: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("company", com)
            .to_path("/all-departs/");
        let list: Listing<Department> = self.api.fetch(&path).await?;
        self.all_depart_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_department(&mut self, pk: i64) -> Result<()> {
        let department: Department = self.api.fetch(&format!("/department/{}/", pk)).await?;
        self.department = Some(department);
        Ok(())
    }

    pub async fn create_department(&mut self, department: &Department, page: u64) -> Result<Department> {
        let created: Department = self.api.create("/department/", department).await?;
        self.fetch_department_list(page).await?;
        Ok(created)
    }

    pub async fn update_department(
        &mut self,
        pk: i64,
        department: &Department,
        page: u64,
    ) -> Result<Department> {
        let updated: Department = self
            .api
            .replace(&format!("/department/{}/", pk), department)
            .await?;
        self.fetch_department_list(page).await?;
        Ok(updated)
    }

    pub async fn delete_department(&mut self, pk: i64) -> Result<()> {
        self.api.delete(&format!("/department/{}/", pk)).await?;
        self.fetch_department_list(1).await
    }
}
