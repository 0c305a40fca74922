use super::{Keyed, NumericCode, Ref};
use serde::{Deserialize, Serialize};

/// 契約基本資料（`/contract/`）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub project: Option<i64>,
    pub order_group: Option<i64>,
    pub unit_type: Option<i64>,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default = "default_true")]
    pub activation: bool,
    #[serde(default, skip_serializing)]
    pub keyunit: Option<Ref<KeyUnit>>,
}

fn default_true() -> bool {
    true
}

impl Keyed for Contract {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

/// 含契約者、單位與付款明細的完整契約（`/contract-set/`）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractSet {
    pub pk: i64,
    pub project: Option<i64>,
    pub order_group: Option<i64>,
    pub unit_type: Option<i64>,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub activation: bool,
    #[serde(default)]
    pub contractor: Option<ContractorInContract>,
    #[serde(default)]
    pub keyunit: Option<KeyUnit>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub total_paid: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractorInContract {
    pub pk: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_registed: bool,
    #[serde(default)]
    pub status: NumericCode,
    #[serde(default)]
    pub contract_date: Option<String>,
    #[serde(default)]
    pub contractoraddress: Option<ContractorAddress>,
    #[serde(default)]
    pub contractorcontact: Option<ContractorContact>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub pk: i64,
    #[serde(default)]
    pub deal_date: Option<String>,
    #[serde(default)]
    pub income: Option<i64>,
    #[serde(default)]
    pub bank_account: Option<i64>,
    #[serde(default)]
    pub trader: String,
}

/// 契約單位（抽象的單位代碼）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyUnit {
    pub pk: Option<i64>,
    #[serde(default)]
    pub unit_code: String,
    #[serde(default)]
    pub contract: Option<i64>,
    #[serde(default)]
    pub houseunit: Option<Ref<HouseUnit>>,
}

impl Keyed for KeyUnit {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

impl KeyUnit {
    pub fn house_unit_id(&self) -> Option<i64> {
        self.houseunit.as_ref().and_then(Ref::id)
    }
}

/// 實際棟/層/號的單位
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HouseUnit {
    pub pk: Option<i64>,
    #[serde(default, rename = "__str__")]
    pub label: String,
    #[serde(default)]
    pub floor_type: Option<i64>,
    #[serde(default)]
    pub key_unit: Option<i64>,
}

impl Keyed for HouseUnit {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Contractor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    #[serde(default)]
    pub contract: Option<Ref<Contract>>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub is_registed: bool,
    #[serde(default)]
    pub status: NumericCode,
    #[serde(default)]
    pub reservation_date: Option<String>,
    #[serde(default)]
    pub contract_date: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub succession: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractorrelease: Option<i64>,
}

impl Keyed for Contractor {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

impl Contractor {
    pub fn contract_id(&self) -> Option<i64> {
        self.contract.as_ref().and_then(Ref::id)
    }

    /// 契約所連結的契約單位 id（需要 API 展開 contract 物件）
    pub fn key_unit_id(&self) -> Option<i64> {
        self.contract
            .as_ref()
            .and_then(Ref::object)
            .and_then(|c| c.keyunit.as_ref())
            .and_then(Ref::id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractorAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    #[serde(default)]
    pub contractor: Option<i64>,
    #[serde(default)]
    pub id_zipcode: String,
    #[serde(default)]
    pub id_address1: String,
    #[serde(default)]
    pub id_address2: String,
    #[serde(default)]
    pub id_address3: String,
    #[serde(default)]
    pub dm_zipcode: String,
    #[serde(default)]
    pub dm_address1: String,
    #[serde(default)]
    pub dm_address2: String,
    #[serde(default)]
    pub dm_address3: String,
}

impl Keyed for ContractorAddress {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractorContact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    #[serde(default)]
    pub contractor: Option<i64>,
    #[serde(default)]
    pub cell_phone: String,
    #[serde(default)]
    pub home_phone: String,
    #[serde(default)]
    pub other_phone: String,
    #[serde(default)]
    pub email: String,
}

impl Keyed for ContractorContact {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OrderGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub project: i64,
    #[serde(default)]
    pub order_number: Option<i64>,
    #[serde(default)]
    pub sort: String,
    #[serde(default, skip_serializing)]
    pub sort_desc: String,
    #[serde(default)]
    pub order_group_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesPrice {
    pub pk: i64,
    pub project: i64,
    pub order_group: Option<i64>,
    pub unit_type: Option<i64>,
    #[serde(default)]
    pub unit_floor_type: Option<i64>,
    #[serde(default)]
    pub price_build: Option<i64>,
    #[serde(default)]
    pub price_land: Option<i64>,
    #[serde(default)]
    pub price_tax: Option<i64>,
    #[serde(default)]
    pub price: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DownPayment {
    pub pk: i64,
    pub project: i64,
    pub order_group: Option<i64>,
    pub unit_type: Option<i64>,
    #[serde(default)]
    pub number_payments: i64,
    #[serde(default)]
    pub payment_amount: i64,
}

/// 訂約/契約彙總（依次數群組 × 房型）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContSummary {
    pub order_group: Option<i64>,
    pub unit_type: Option<i64>,
    #[serde(default)]
    pub conts_num: i64,
    #[serde(default)]
    pub price_sum: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SerialRef {
    pub pk: i64,
    #[serde(default)]
    pub serial_number: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NameRef {
    pub pk: i64,
    #[serde(default)]
    pub name: String,
}

/// 權利義務承繼
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Succession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub contract: Option<SerialRef>,
    pub seller: Option<NameRef>,
    pub buyer: Option<NameRef>,
    #[serde(default)]
    pub apply_date: Option<String>,
    #[serde(default)]
    pub trading_date: Option<String>,
    #[serde(default)]
    pub is_approval: bool,
    #[serde(default)]
    pub approval_date: Option<String>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Buyer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub id_zipcode: String,
    #[serde(default)]
    pub id_address1: String,
    #[serde(default)]
    pub id_address2: String,
    #[serde(default)]
    pub id_address3: String,
    #[serde(default)]
    pub dm_zipcode: String,
    #[serde(default)]
    pub dm_address1: String,
    #[serde(default)]
    pub dm_address2: String,
    #[serde(default)]
    pub dm_address3: String,
    #[serde(default)]
    pub cell_phone: String,
    #[serde(default)]
    pub home_phone: String,
    #[serde(default)]
    pub other_phone: String,
    #[serde(default)]
    pub email: String,
}

/// 解約申請紀錄
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContractRelease {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pk: Option<i64>,
    pub project: i64,
    pub contractor: i64,
    #[serde(default)]
    pub status: NumericCode,
    #[serde(default)]
    pub refund_amount: Option<i64>,
    #[serde(default)]
    pub refund_account_bank: String,
    #[serde(default)]
    pub refund_account_number: String,
    #[serde(default)]
    pub refund_account_depositor: String,
    #[serde(default)]
    pub request_date: Option<String>,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl Keyed for ContractRelease {
    fn key(&self) -> Option<i64> {
        self.pk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contractor_nested_contract_links() {
        let contractor: Contractor = serde_json::from_value(serde_json::json!({
            "pk": 7,
            "contract": {"pk": 3, "project": 1, "order_group": 5, "unit_type": 2,
                         "serial_number": "A101-5", "activation": true, "keyunit": 9},
            "name": "홍길동",
            "status": "2",
            "is_registed": true
        }))
        .unwrap();
        assert_eq!(contractor.contract_id(), Some(3));
        assert_eq!(contractor.key_unit_id(), Some(9));
        assert_eq!(contractor.status, NumericCode(2));
    }

    #[test]
    fn test_contractor_flat_contract_link() {
        let contractor: Contractor =
            serde_json::from_value(serde_json::json!({"pk": 7, "contract": 3})).unwrap();
        assert_eq!(contractor.contract_id(), Some(3));
        assert_eq!(contractor.key_unit_id(), None);
    }

    #[test]
    fn test_key_unit_house_unit_shapes() {
        let flat: KeyUnit =
            serde_json::from_value(serde_json::json!({"pk": 9, "unit_code": "A101", "houseunit": 12}))
                .unwrap();
        let nested: KeyUnit = serde_json::from_value(serde_json::json!({
            "pk": 9, "unit_code": "A101", "houseunit": {"pk": 12, "__str__": "101동 1001호"}
        }))
        .unwrap();
        assert_eq!(flat.house_unit_id(), Some(12));
        assert_eq!(nested.house_unit_id(), Some(12));
    }
}
