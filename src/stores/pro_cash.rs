use crate::domain::model::{
    AccountSort, BalanceByAccount, CashBookFilter, LastDeal, Listing, Page, ProBankAcc,
    ProCalculated, ProjectAccountD2, ProjectAccountD3, ProjectCashBook, SelectOption,
};
use crate::domain::ports::{ApiClient, ApiClientExt};
use crate::utils::error::Result;
use crate::utils::query::{page_count, QueryBuilder};
use serde_json::Value;
use std::sync::Arc;

impl CashBookFilter {
    /// 收支帳/前渡金列表共用的查詢字串
    pub fn to_query(&self, project: i64) -> QueryBuilder {
        QueryBuilder::new()
            .param("project", project)
            .opt("from_deal_date", self.from_date.as_deref())
            .opt("to_deal_date", self.to_date.as_deref())
            .opt("sort", self.sort)
            .opt("project_account_d2__d1", self.account_d1)
            .opt("project_account_d2", self.pro_acc_d2)
            .opt("project_account_d3", self.pro_acc_d3)
            .opt("bank_account", self.bank_account)
            .opt("contract", self.contract)
            .opt("search", self.search.as_deref())
            .param("page", self.page.filter(|p| *p > 0).unwrap_or(1))
    }
}

/// 收支帳修改時的附加選項
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CashBookEdit {
    /// 解除與契約的連結（送出 `contract: null`）
    pub remove_contract: bool,
}

/// 現場資金（帳目、帳戶、收支帳）
pub struct ProCashStore {
    api: Arc<dyn ApiClient>,

    pub sort_list: Vec<AccountSort>,
    pub all_acc_d2_list: Vec<ProjectAccountD2>,
    pub all_acc_d3_list: Vec<ProjectAccountD3>,
    pub form_acc_d2_list: Vec<ProjectAccountD2>,
    pub form_acc_d3_list: Vec<ProjectAccountD3>,

    pub bank_account_list: Vec<ProBankAcc>,
    pub all_bank_account_list: Vec<ProBankAcc>,

    pub balance_by_acc_list: Vec<BalanceByAccount>,
    pub date_cash_book: Vec<ProjectCashBook>,

    pub cash_book_list: Vec<ProjectCashBook>,
    pub cash_book_count: u64,
    pub imprest_list: Vec<ProjectCashBook>,
    pub imprest_count: u64,

    pub calculated: Vec<ProCalculated>,
    pub last_deal: Vec<LastDeal>,
}

impl ProCashStore {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            sort_list: Vec::new(),
            all_acc_d2_list: Vec::new(),
            all_acc_d3_list: Vec::new(),
            form_acc_d2_list: Vec::new(),
            form_acc_d3_list: Vec::new(),
            bank_account_list: Vec::new(),
            all_bank_account_list: Vec::new(),
            balance_by_acc_list: Vec::new(),
            date_cash_book: Vec::new(),
            cash_book_list: Vec::new(),
            cash_book_count: 0,
            imprest_list: Vec::new(),
            imprest_count: 0,
            calculated: Vec::new(),
            last_deal: Vec::new(),
        }
    }

    // ---- 帳目 ----

    pub async fn fetch_sort_list(&mut self) -> Result<()> {
        let list: Listing<AccountSort> = self.api.fetch("/account-sort/").await?;
        self.sort_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_all_acc_d2_list(&mut self) -> Result<()> {
        let list: Listing<ProjectAccountD2> = self.api.fetch("/project-account-depth2/").await?;
        self.all_acc_d2_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_all_acc_d3_list(&mut self) -> Result<()> {
        let list: Listing<ProjectAccountD3> = self.api.fetch("/project-account-depth3/").await?;
        self.all_acc_d3_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_form_acc_d2_list(&mut self, d1: Option<i64>, sort: Option<i64>) -> Result<()> {
        let path = QueryBuilder::new()
            .opt("d1__sorts", sort)
            .opt("d1", d1)
            .to_path("/project-account-depth2/");
        let list: Listing<ProjectAccountD2> = self.api.fetch(&path).await?;
        self.form_acc_d2_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_form_acc_d3_list(&mut self, d2: Option<i64>, sort: Option<i64>) -> Result<()> {
        let path = QueryBuilder::new()
            .param("sort", sort.map(|s| s.to_string()).unwrap_or_default())
            .param("d2", d2.map(|d| d.to_string()).unwrap_or_default())
            .to_path("/project-account-depth3/");
        let list: Listing<ProjectAccountD3> = self.api.fetch(&path).await?;
        self.form_acc_d3_list = list.into_vec();
        Ok(())
    }

    // ---- 帳戶 ----

    pub fn bank_options(&self) -> Vec<SelectOption<Option<i64>>> {
        self.bank_account_list
            .iter()
            .map(|b| SelectOption {
                value: b.pk,
                label: b.alias_name.clone(),
            })
            .collect()
    }

    /// 前渡金帳戶
    pub fn imprest_bank_accounts(&self) -> Vec<&ProBankAcc> {
        self.all_bank_account_list
            .iter()
            .filter(|b| b.is_imprest)
            .collect()
    }

    pub fn imprest_bank_options(&self) -> Vec<SelectOption<Option<i64>>> {
        self.imprest_bank_accounts()
            .into_iter()
            .filter(|b| !b.inactive)
            .map(|b| SelectOption {
                value: b.pk,
                label: b.alias_name.clone(),
            })
            .collect()
    }

    /// 使用中且未隱藏的帳戶
    pub async fn fetch_bank_acc_list(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .param("is_hide", false)
            .param("inactive", false)
            .to_path("/project-bank-account/");
        let list: Listing<ProBankAcc> = self.api.fetch(&path).await?;
        self.bank_account_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_all_bank_acc_list(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/project-bank-account/");
        let list: Listing<ProBankAcc> = self.api.fetch(&path).await?;
        self.all_bank_account_list = list.into_vec();
        Ok(())
    }

    async fn refresh_bank_accounts(&mut self, project: i64) -> Result<()> {
        self.fetch_bank_acc_list(project).await?;
        self.fetch_all_bank_acc_list(project).await
    }

    pub async fn create_bank_acc(&mut self, account: &ProBankAcc) -> Result<ProBankAcc> {
        let created: ProBankAcc = self.api.create("/project-bank-account/", account).await?;
        self.refresh_bank_accounts(created.project.unwrap_or_default())
            .await?;
        Ok(created)
    }

    pub async fn update_bank_acc(&mut self, pk: i64, account: &ProBankAcc) -> Result<ProBankAcc> {
        let updated: ProBankAcc = self
            .api
            .replace(&format!("/project-bank-account/{}/", pk), account)
            .await?;
        self.refresh_bank_accounts(updated.project.unwrap_or_default())
            .await?;
        Ok(updated)
    }

    pub async fn patch_bank_acc(&mut self, pk: i64, fields: &Value) -> Result<ProBankAcc> {
        let patched: ProBankAcc = self
            .api
            .modify(&format!("/project-bank-account/{}/", pk), fields)
            .await?;
        self.refresh_bank_accounts(patched.project.unwrap_or_default())
            .await?;
        Ok(patched)
    }

    pub async fn delete_bank_acc(&mut self, pk: i64, project: i64) -> Result<()> {
        self.api
            .delete(&format!("/project-bank-account/{}/", pk))
            .await?;
        self.refresh_bank_accounts(project).await
    }

    // ---- 餘額 / 日報 ----

    pub async fn fetch_balance_by_acc_list(
        &mut self,
        project: i64,
        direct: bool,
        date: Option<&str>,
    ) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .param("bank_account__directpay", direct)
            .opt("date", date)
            .to_path("/pr-balance-by-acc/");
        let list: Listing<BalanceByAccount> = self.api.fetch(&path).await?;
        self.balance_by_acc_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_date_cash_book_list(&mut self, project: i64, date: &str) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .param("date", date)
            .to_path("/pr-date-cashbook/");
        let list: Listing<ProjectCashBook> = self.api.fetch(&path).await?;
        self.date_cash_book = list.into_vec();
        Ok(())
    }

    // ---- 收支帳 ----

    pub fn cash_book_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.cash_book_count, items_per_page)
    }

    /// 回應可能是分頁物件，也可能是陣列
    pub async fn fetch_cash_book_list(&mut self, project: i64, filter: &CashBookFilter) -> Result<()> {
        let path = filter.to_query(project).to_path("/project-cashbook/");
        let listing: Listing<ProjectCashBook> = self.api.fetch(&path).await?;
        match listing {
            Listing::Paged(page) => {
                self.cash_book_list = page.results;
                self.cash_book_count = page.count;
            }
            Listing::Plain(items) => {
                self.cash_book_count = items.len() as u64;
                self.cash_book_list = items;
            }
        }
        Ok(())
    }

    /// 特定契約的分期款項
    pub async fn contract_payments(&self, contract: i64) -> Result<Vec<ProjectCashBook>> {
        let path = QueryBuilder::new()
            .param("contract", contract)
            .to_path("/project-cashbook/");
        let list: Listing<ProjectCashBook> = self.api.fetch(&path).await?;
        Ok(list.into_vec())
    }

    pub async fn post_cash_book(&self, entry: &ProjectCashBook) -> Result<ProjectCashBook> {
        self.api.create("/project-cashbook/", entry).await
    }

    pub async fn put_cash_book(&self, pk: i64, entry: &ProjectCashBook) -> Result<ProjectCashBook> {
        self.api
            .replace(&format!("/project-cashbook/{}/", pk), entry)
            .await
    }

    pub async fn patch_cash_book_fields(&self, pk: i64, fields: &Value) -> Result<ProjectCashBook> {
        self.api
            .modify(&format!("/project-cashbook/{}/", pk), fields)
            .await
    }

    pub async fn create_cash_book(
        &mut self,
        entry: &ProjectCashBook,
        filter: &CashBookFilter,
    ) -> Result<ProjectCashBook> {
        let created = self.post_cash_book(entry).await?;
        let project = created.project.unwrap_or_default();
        self.fetch_cash_book_list(project, filter).await?;
        self.fetch_imprest_list(project, filter).await?;
        Ok(created)
    }

    pub async fn update_cash_book(
        &mut self,
        pk: i64,
        entry: &ProjectCashBook,
        edit: CashBookEdit,
        filter: &CashBookFilter,
    ) -> Result<ProjectCashBook> {
        let mut entry = entry.clone();
        if edit.remove_contract {
            entry.contract = None;
        }
        let updated = self.put_cash_book(pk, &entry).await?;
        self.fetch_cash_book_list(updated.project.unwrap_or_default(), filter)
            .await?;
        Ok(updated)
    }

    pub async fn patch_cash_book(
        &mut self,
        pk: i64,
        fields: &Value,
        edit: CashBookEdit,
        filter: &CashBookFilter,
    ) -> Result<ProjectCashBook> {
        let mut fields = fields.clone();
        if edit.remove_contract {
            if let Some(map) = fields.as_object_mut() {
                map.insert("contract".to_string(), Value::Null);
            }
        }
        let patched = self.patch_cash_book_fields(pk, &fields).await?;
        self.fetch_cash_book_list(patched.project.unwrap_or_default(), filter)
            .await?;
        Ok(patched)
    }

    pub async fn delete_cash_book(
        &mut self,
        pk: i64,
        project: i64,
        filter: &CashBookFilter,
    ) -> Result<()> {
        self.api
            .delete(&format!("/project-cashbook/{}/", pk))
            .await?;
        self.fetch_cash_book_list(project, filter).await
    }

    // ---- 前渡金 ----

    pub fn imprest_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.imprest_count, items_per_page)
    }

    pub async fn fetch_imprest_list(&mut self, project: i64, filter: &CashBookFilter) -> Result<()> {
        let path = filter.to_query(project).to_path("/project-imprest/");
        let page: Page<ProjectCashBook> = self.api.fetch(&path).await?;
        self.imprest_list = page.results;
        self.imprest_count = page.count;
        Ok(())
    }

    pub async fn update_imprest(
        &mut self,
        pk: i64,
        entry: &ProjectCashBook,
        filter: &CashBookFilter,
    ) -> Result<ProjectCashBook> {
        let updated: ProjectCashBook = self
            .api
            .replace(&format!("/project-imprest/{}/", pk), entry)
            .await?;
        self.fetch_imprest_list(updated.project.unwrap_or_default(), filter)
            .await?;
        Ok(updated)
    }

    pub async fn patch_imprest(
        &mut self,
        pk: i64,
        fields: &Value,
        filter: &CashBookFilter,
    ) -> Result<ProjectCashBook> {
        let patched: ProjectCashBook = self
            .api
            .modify(&format!("/project-imprest/{}/", pk), fields)
            .await?;
        self.fetch_imprest_list(patched.project.unwrap_or_default(), filter)
            .await?;
        Ok(patched)
    }

    pub async fn delete_imprest(
        &mut self,
        pk: i64,
        project: i64,
        filter: &CashBookFilter,
    ) -> Result<()> {
        self.api
            .delete(&format!("/project-imprest/{}/", pk))
            .await?;
        self.fetch_imprest_list(project, filter).await
    }

    // ---- 結算 ----

    pub fn pro_calculated(&self) -> Option<&ProCalculated> {
        self.calculated.first()
    }

    pub fn last_deal_date(&self) -> Option<&str> {
        self.last_deal.first().map(|d| d.deal_date.as_str())
    }

    pub async fn fetch_pro_cash_calc(&mut self, company: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("company", company)
            .to_path("/pro-cash-calc/");
        let list: Listing<ProCalculated> = self.api.fetch(&path).await?;
        self.calculated = list.into_vec();
        Ok(())
    }

    pub async fn create_pro_cash_calc(&self, calc: &ProCalculated) -> Result<ProCalculated> {
        self.api.create("/pro-cash-calc/", calc).await
    }

    pub async fn patch_pro_cash_calc(&self, pk: i64, calc: &ProCalculated) -> Result<ProCalculated> {
        self.api
            .modify(&format!("/pro-cash-calc/{}/", pk), calc)
            .await
    }

    pub async fn fetch_pro_last_deal(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/pro-last-deal/");
        let list: Listing<LastDeal> = self.api.fetch(&path).await?;
        self.last_deal = list.into_vec();
        Ok(())
    }
}
