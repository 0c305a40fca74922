use crate::domain::model::{
    Buyer, ContSummary, Contract, ContractRelease, ContractSet, Contractor, ContractorAddress,
    ContractorContact, DownPayment, HouseUnit, KeyUnit, Listing, OrderGroup, Page, SalesPrice,
    SelectOption, Succession,
};
use crate::domain::ports::{ApiClient, ApiClientExt};
use crate::utils::error::Result;
use crate::utils::query::{page_count, QueryBuilder};
use serde_json::json;
use std::sync::Arc;

/// 契約列表過濾條件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContFilter {
    pub project: i64,
    pub order_group: Option<String>,
    pub unit_type: Option<String>,
    pub building: Option<String>,
    pub status: Option<String>,
    pub null_unit: bool,
    pub registed: Option<String>,
    pub ordering: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub search: Option<String>,
    pub page: Option<u64>,
}

impl ContFilter {
    pub fn for_project(project: i64) -> Self {
        Self {
            project,
            ..Self::default()
        }
    }

    /// 預設只看有效契約、狀態 "2"、依建立時間倒序
    pub fn to_query(&self) -> QueryBuilder {
        let status = self.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("2");
        let ordering = self
            .ordering
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("-created_at");
        QueryBuilder::new()
            .param("project", self.project)
            .param("activation", "true")
            .param("contractor__status", status)
            .opt("order_group", self.order_group.as_deref())
            .opt("unit_type", self.unit_type.as_deref())
            .opt("keyunit__houseunit__building_unit", self.building.as_deref())
            .flag("houseunit__isnull", self.null_unit)
            .opt("contractor__is_registed", self.registed.as_deref())
            .opt("from_contract_date", self.from_date.as_deref())
            .opt("to_contract_date", self.to_date.as_deref())
            .opt("search", self.search.as_deref())
            .param("ordering", ordering)
            .param("page", self.page.filter(|p| *p > 0).unwrap_or(1))
    }
}

/// 契約單位列表過濾條件
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitFilter {
    pub project: i64,
    pub unit_type: Option<i64>,
    pub contract: Option<i64>,
    pub available: Option<bool>,
}

/// 契約領域的狀態與動作
pub struct ContractStore {
    api: Arc<dyn ApiClient>,

    pub contract: Option<ContractSet>,
    pub contract_list: Vec<ContractSet>,
    pub contracts_count: u64,
    pub cont_list: Vec<Contract>,

    pub contractor: Option<Contractor>,
    pub contractor_list: Vec<Contractor>,

    pub subs_summary_list: Vec<ContSummary>,
    pub cont_summary_list: Vec<ContSummary>,

    pub order_group_list: Vec<OrderGroup>,
    pub key_unit_list: Vec<KeyUnit>,
    pub house_unit_list: Vec<HouseUnit>,
    pub project_house_unit_list: Vec<HouseUnit>,
    pub sales_price_list: Vec<SalesPrice>,
    pub down_payment_list: Vec<DownPayment>,

    pub succession: Option<Succession>,
    pub succession_list: Vec<Succession>,
    pub succession_count: u64,

    pub buyer: Option<Buyer>,
    pub buyer_list: Vec<Buyer>,

    pub cont_release: Option<ContractRelease>,
    pub cont_release_list: Vec<ContractRelease>,
    pub cont_release_count: u64,
}

impl ContractStore {
    pub fn new(api: Arc<dyn ApiClient>) -> Self {
        Self {
            api,
            contract: None,
            contract_list: Vec::new(),
            contracts_count: 0,
            cont_list: Vec::new(),
            contractor: None,
            contractor_list: Vec::new(),
            subs_summary_list: Vec::new(),
            cont_summary_list: Vec::new(),
            order_group_list: Vec::new(),
            key_unit_list: Vec::new(),
            house_unit_list: Vec::new(),
            project_house_unit_list: Vec::new(),
            sales_price_list: Vec::new(),
            down_payment_list: Vec::new(),
            succession: None,
            succession_list: Vec::new(),
            succession_count: 0,
            buyer: None,
            buyer_list: Vec::new(),
            cont_release: None,
            cont_release_list: Vec::new(),
            cont_release_count: 0,
        }
    }

    pub fn api(&self) -> Arc<dyn ApiClient> {
        Arc::clone(&self.api)
    }

    // ---- 契約 ----

    pub fn contract_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.contracts_count, items_per_page)
    }

    pub async fn fetch_contract(&mut self, pk: i64) -> Result<()> {
        let contract: ContractSet = self.api.fetch(&format!("/contract-set/{}/", pk)).await?;
        self.contract = Some(contract);
        Ok(())
    }

    pub async fn fetch_contract_list(&mut self, filter: &ContFilter) -> Result<()> {
        let path = filter.to_query().to_path("/contract-set/");
        let page: Page<ContractSet> = self.api.fetch(&path).await?;
        tracing::debug!("📂 contract list: {} of {}", page.results.len(), page.count);
        self.contract_list = page.results;
        self.contracts_count = page.count;
        Ok(())
    }

    pub async fn fetch_cont_list(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/contract/");
        let list: Listing<Contract> = self.api.fetch(&path).await?;
        self.cont_list = list.into_vec();
        Ok(())
    }

    /// 個別契約供給價重新設定
    pub async fn all_cont_price_set(&self, contract: &Contract) -> Result<Contract> {
        let pk = contract.pk.unwrap_or_default();
        self.api
            .replace(&format!("/contract/{}/", pk), contract)
            .await
    }

    pub async fn get_contract(&self, pk: i64) -> Result<Contract> {
        self.api.fetch(&format!("/contract/{}/", pk)).await
    }

    pub async fn create_contract(&self, contract: &Contract) -> Result<Contract> {
        self.api.create("/contract/", contract).await
    }

    pub async fn update_contract(&self, pk: i64, contract: &Contract) -> Result<Contract> {
        self.api
            .replace(&format!("/contract/{}/", pk), contract)
            .await
    }

    pub async fn terminate_contract(&self, pk: i64, serial_number: &str) -> Result<Contract> {
        self.api
            .modify(
                &format!("/contract/{}/", pk),
                &json!({"serial_number": serial_number, "activation": false}),
            )
            .await
    }

    // ---- 單位連結 ----

    pub async fn patch_key_unit(&self, pk: i64, contract: Option<i64>) -> Result<KeyUnit> {
        self.api
            .modify(&format!("/key-unit/{}/", pk), &json!({ "contract": contract }))
            .await
    }

    pub async fn patch_house_unit(&self, pk: i64, key_unit: Option<i64>) -> Result<HouseUnit> {
        self.api
            .modify(&format!("/house-unit/{}/", pk), &json!({ "key_unit": key_unit }))
            .await
    }

    // ---- 契約者 ----

    pub async fn get_contractor(&self, pk: i64) -> Result<Contractor> {
        self.api.fetch(&format!("/contractor/{}/", pk)).await
    }

    pub async fn fetch_contractor(&mut self, pk: i64) -> Result<()> {
        let contractor = self.get_contractor(pk).await?;
        self.contractor = Some(contractor);
        Ok(())
    }

    pub async fn fetch_contractor_list(&mut self, project: i64, search: &str) -> Result<()> {
        let path = QueryBuilder::new()
            .param("contract__project", project)
            .param("search", search)
            .to_path("/contractor/");
        let list: Listing<Contractor> = self.api.fetch(&path).await?;
        self.contractor_list = list.into_vec();
        Ok(())
    }

    pub async fn create_contractor(&self, contractor: &Contractor) -> Result<Contractor> {
        self.api.create("/contractor/", contractor).await
    }

    pub async fn update_contractor(&self, pk: i64, contractor: &Contractor) -> Result<Contractor> {
        self.api
            .replace(&format!("/contractor/{}/", pk), contractor)
            .await
    }

    /// 解約時的契約者狀態變更
    pub async fn release_contractor(&self, pk: i64, status: &str) -> Result<Contractor> {
        self.api
            .modify(
                &format!("/contractor/{}/", pk),
                &json!({"is_registed": false, "status": status}),
            )
            .await
    }

    pub async fn create_address(&self, address: &ContractorAddress) -> Result<ContractorAddress> {
        self.api.create("/contractor-address/", address).await
    }

    pub async fn update_address(
        &self,
        pk: i64,
        address: &ContractorAddress,
    ) -> Result<ContractorAddress> {
        self.api
            .replace(&format!("/contractor-address/{}/", pk), address)
            .await
    }

    pub async fn create_contact(&self, contact: &ContractorContact) -> Result<ContractorContact> {
        self.api.create("/contractor-contact/", contact).await
    }

    pub async fn update_contact(
        &self,
        pk: i64,
        contact: &ContractorContact,
    ) -> Result<ContractorContact> {
        self.api
            .replace(&format!("/contractor-contact/{}/", pk), contact)
            .await
    }

    // ---- 彙總 ----

    pub async fn fetch_subs_summary_list(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/subs-sum/");
        let list: Listing<ContSummary> = self.api.fetch(&path).await?;
        self.subs_summary_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_cont_summary_list(&mut self, project: i64, date: &str) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .param("to_contract_date", date)
            .to_path("/cont-sum/");
        let list: Listing<ContSummary> = self.api.fetch(&path).await?;
        self.cont_summary_list = list.into_vec();
        Ok(())
    }

    // ---- 次數群組 ----

    pub fn order_group_options(&self) -> Vec<SelectOption<Option<i64>>> {
        self.order_group_list
            .iter()
            .map(|o| SelectOption {
                value: o.pk,
                label: o.order_group_name.clone(),
            })
            .collect()
    }

    pub async fn fetch_order_group_list(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/order-group/");
        let list: Listing<OrderGroup> = self.api.fetch(&path).await?;
        self.order_group_list = list.into_vec();
        Ok(())
    }

    pub async fn create_order_group(&mut self, group: &OrderGroup) -> Result<OrderGroup> {
        let created: OrderGroup = self.api.create("/order-group/", group).await?;
        self.fetch_order_group_list(created.project).await?;
        Ok(created)
    }

    pub async fn update_order_group(&mut self, pk: i64, group: &OrderGroup) -> Result<OrderGroup> {
        let updated: OrderGroup = self
            .api
            .replace(&format!("/order-group/{}/", pk), group)
            .await?;
        self.fetch_order_group_list(updated.project).await?;
        Ok(updated)
    }

    pub async fn delete_order_group(&mut self, pk: i64, project: i64) -> Result<()> {
        self.api.delete(&format!("/order-group/{}/", pk)).await?;
        self.fetch_order_group_list(project).await
    }

    // ---- 單位 / 價格 ----

    pub fn key_unit_options(&self) -> Vec<SelectOption<Option<i64>>> {
        self.key_unit_list
            .iter()
            .map(|k| SelectOption {
                value: k.pk,
                label: k.unit_code.clone(),
            })
            .collect()
    }

    pub fn house_unit_options(&self) -> Vec<SelectOption<Option<i64>>> {
        self.house_unit_list
            .iter()
            .map(|h| SelectOption {
                value: h.pk,
                label: h.label.clone(),
            })
            .collect()
    }

    pub async fn fetch_key_unit_list(&mut self, filter: &UnitFilter) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", filter.project)
            .param(
                "unit_type",
                filter.unit_type.map(|u| u.to_string()).unwrap_or_default(),
            )
            .param(
                "contract",
                filter.contract.map(|c| c.to_string()).unwrap_or_default(),
            )
            .param("available", filter.available.unwrap_or(true))
            .to_path("/key-unit/");
        let list: Listing<KeyUnit> = self.api.fetch(&path).await?;
        self.key_unit_list = list.into_vec();
        Ok(())
    }

    /// 可選用的棟號（包含目前契約已連結者）
    pub async fn fetch_house_unit_list(
        &mut self,
        project: i64,
        unit_type: Option<i64>,
        contract: Option<i64>,
    ) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .opt("unit_type", unit_type)
            .opt("contract", contract)
            .to_path("/available-house-unit/");
        let list: Listing<HouseUnit> = self.api.fetch(&path).await?;
        self.house_unit_list = list.into_vec();
        Ok(())
    }

    /// 專案全部棟號
    pub async fn fetch_project_house_units(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/house-unit/");
        let list: Listing<HouseUnit> = self.api.fetch(&path).await?;
        self.project_house_unit_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_sale_price_list(
        &mut self,
        project: i64,
        order_group: Option<i64>,
        unit_type: Option<i64>,
    ) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .opt("order_group", order_group)
            .opt("unit_type", unit_type)
            .to_path("/price/");
        let list: Listing<SalesPrice> = self.api.fetch(&path).await?;
        self.sales_price_list = list.into_vec();
        Ok(())
    }

    pub async fn fetch_down_pay_list(
        &mut self,
        project: i64,
        order_group: Option<i64>,
        unit_type: Option<i64>,
    ) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .opt("order_group", order_group)
            .opt("unit_type", unit_type)
            .to_path("/down-payment/");
        let list: Listing<DownPayment> = self.api.fetch(&path).await?;
        self.down_payment_list = list.into_vec();
        Ok(())
    }

    // ---- 權利義務承繼 ----

    pub fn succession_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.succession_count, items_per_page)
    }

    pub async fn fetch_succession(&mut self, pk: i64) -> Result<()> {
        let succession: Succession = self.api.fetch(&format!("/succession/{}/", pk)).await?;
        self.succession = Some(succession);
        Ok(())
    }

    pub async fn fetch_succession_list(&mut self, project: i64, page: u64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("contract__project", project)
            .param("page", page.max(1))
            .to_path("/succession/");
        let page: Page<Succession> = self.api.fetch(&path).await?;
        self.succession_list = page.results;
        self.succession_count = page.count;
        Ok(())
    }

    pub async fn create_succession(&mut self, project: i64, succession: &Succession) -> Result<()> {
        let _: Succession = self.api.create("/succession/", succession).await?;
        self.fetch_succession_list(project, 1).await
    }

    pub async fn update_succession(
        &mut self,
        project: i64,
        page: u64,
        pk: i64,
        succession: &Succession,
    ) -> Result<()> {
        let _: Succession = self
            .api
            .replace(&format!("/succession/{}/", pk), succession)
            .await?;
        self.fetch_succession_list(project, page).await
    }

    pub async fn fetch_buyer(&mut self, pk: i64) -> Result<()> {
        let buyer: Buyer = self
            .api
            .fetch(&format!("/succession-buyer/{}/", pk))
            .await?;
        self.buyer = Some(buyer);
        Ok(())
    }

    pub async fn fetch_buyer_list(&mut self, project: i64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .to_path("/succession-buyer/");
        let list: Listing<Buyer> = self.api.fetch(&path).await?;
        self.buyer_list = list.into_vec();
        Ok(())
    }

    pub async fn create_buyer(&self, buyer: &Buyer) -> Result<Buyer> {
        self.api.create("/succession-buyer/", buyer).await
    }

    pub async fn patch_buyer(&self, pk: i64, buyer: &Buyer) -> Result<Buyer> {
        self.api
            .modify(&format!("/succession-buyer/{}/", pk), buyer)
            .await
    }

    // ---- 解約紀錄 ----

    pub fn release_pages(&self, items_per_page: u64) -> u64 {
        page_count(self.cont_release_count, items_per_page)
    }

    pub async fn get_cont_release(&self, pk: i64) -> Result<ContractRelease> {
        self.api
            .fetch(&format!("/contractor-release/{}/", pk))
            .await
    }

    pub async fn fetch_cont_release(&mut self, pk: i64) -> Result<()> {
        let release = self.get_cont_release(pk).await?;
        self.cont_release = Some(release);
        Ok(())
    }

    pub async fn fetch_cont_release_list(&mut self, project: i64, page: u64) -> Result<()> {
        let path = QueryBuilder::new()
            .param("project", project)
            .param("page", page.max(1))
            .to_path("/contractor-release/");
        let page: Page<ContractRelease> = self.api.fetch(&path).await?;
        self.cont_release_list = page.results;
        self.cont_release_count = page.count;
        Ok(())
    }

    /// 退款金額未填時不送出該欄位
    pub async fn create_release_record(&self, release: &ContractRelease) -> Result<ContractRelease> {
        let mut body = serde_json::to_value(release)?;
        if release.refund_amount.is_none() {
            if let Some(map) = body.as_object_mut() {
                map.remove("refund_amount");
            }
        }
        self.api.create("/contractor-release/", &body).await
    }

    pub async fn update_release_record(
        &self,
        pk: i64,
        release: &ContractRelease,
    ) -> Result<ContractRelease> {
        self.api
            .replace(&format!("/contractor-release/{}/", pk), release)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::HttpApiClient;
    use httpmock::prelude::*;

    fn store(server: &MockServer) -> ContractStore {
        ContractStore::new(Arc::new(HttpApiClient::new(server.base_url())))
    }

    #[test]
    fn test_cont_filter_defaults() {
        let query = ContFilter::for_project(3).to_query().build();
        assert_eq!(
            query,
            "project=3&activation=true&contractor__status=2&ordering=-created_at&page=1"
        );
    }

    #[test]
    fn test_cont_filter_all_fields() {
        let filter = ContFilter {
            project: 3,
            order_group: Some("5".to_string()),
            unit_type: Some("2".to_string()),
            building: Some("101".to_string()),
            status: Some("1".to_string()),
            null_unit: true,
            registed: Some("true".to_string()),
            ordering: Some("serial_number".to_string()),
            from_date: Some("2024-01-01".to_string()),
            to_date: Some("2024-02-01".to_string()),
            search: Some("hong".to_string()),
            page: Some(4),
        };
        assert_eq!(
            filter.to_query().build(),
            "project=3&activation=true&contractor__status=1&order_group=5&unit_type=2\
             &keyunit__houseunit__building_unit=101&houseunit__isnull=true\
             &contractor__is_registed=true&from_contract_date=2024-01-01\
             &to_contract_date=2024-02-01&search=hong&ordering=serial_number&page=4"
        );
    }

    #[tokio::test]
    async fn test_fetch_contract_list_updates_state() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/contract-set/")
                .query_param("project", "1")
                .query_param("contractor__status", "2")
                .query_param("page", "1");
            then.status(200).json_body(serde_json::json!({
                "count": 21,
                "results": [{"pk": 1, "project": 1, "order_group": 5, "unit_type": 2,
                             "serial_number": "A101-5", "activation": true}]
            }));
        });

        let mut store = store(&server);
        store
            .fetch_contract_list(&ContFilter::for_project(1))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(store.contract_list.len(), 1);
        assert_eq!(store.contracts_count, 21);
        assert_eq!(store.contract_pages(10), 3);
    }

    #[tokio::test]
    async fn test_key_unit_list_defaults_available() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/key-unit/")
                .query_param("project", "1")
                .query_param("unit_type", "")
                .query_param("contract", "")
                .query_param("available", "true");
            then.status(200).json_body(serde_json::json!({
                "count": 1,
                "results": [{"pk": 9, "unit_code": "A101", "houseunit": null}]
            }));
        });

        let mut store = store(&server);
        store
            .fetch_key_unit_list(&UnitFilter {
                project: 1,
                ..UnitFilter::default()
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(
            store.key_unit_options(),
            vec![SelectOption {
                value: Some(9),
                label: "A101".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_order_group_refetches_list() {
        let server = MockServer::start();
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/order-group/4/");
            then.status(204);
        });
        let list = server.mock(|when, then| {
            when.method(GET)
                .path("/order-group/")
                .query_param("project", "1");
            then.status(200).json_body(serde_json::json!({
                "count": 1,
                "results": [{"pk": 5, "project": 1, "sort": "1", "order_group_name": "1차"}]
            }));
        });

        let mut store = store(&server);
        store.delete_order_group(4, 1).await.unwrap();

        delete.assert();
        list.assert();
        assert_eq!(store.order_group_options()[0].label, "1차");
    }

    #[tokio::test]
    async fn test_create_release_record_omits_empty_refund() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/contractor-release/")
                .json_body(serde_json::json!({
                    "project": 1, "contractor": 7, "status": "1",
                    "refund_account_bank": "", "refund_account_number": "",
                    "refund_account_depositor": "", "request_date": "2024-05-01",
                    "completion_date": null, "note": ""
                }));
            then.status(201).json_body(serde_json::json!({
                "pk": 2, "project": 1, "contractor": 7, "status": "1"
            }));
        });

        let store = store(&server);
        let created = store
            .create_release_record(&ContractRelease {
                project: 1,
                contractor: 7,
                status: 1.into(),
                request_date: Some("2024-05-01".to_string()),
                ..ContractRelease::default()
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(created.pk, Some(2));
    }
}
