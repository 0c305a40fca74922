use crate::domain::model::{
    non_empty, Contract, Contractor, ContractorAddress, ContractorContact, NumericCode,
    ProjectCashBook, Ref,
};
use crate::domain::ports::Notifier;
use crate::router::RouteLocation;
use crate::stores::{ContFilter, ContractStore, ProCashStore};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field};
use crate::workflow::saga::{Compensation, Saga, StepRecord};
use serde::Deserialize;
use serde_json::json;

/// 儲存後導向的契約登錄畫面
pub const CONTRACT_REGISTER_ROUTE: &str = "계약등록 관리";

/// `"id,code"` 形式的選項值
#[derive(Debug, Clone, PartialEq)]
pub struct CodedRef {
    pub id: i64,
    pub code: String,
}

impl CodedRef {
    pub fn parse(field: &str, raw: &str) -> Result<Self> {
        let invalid = || ClientError::InvalidReference {
            field: field.to_string(),
            value: raw.to_string(),
        };
        let mut parts = raw.split(',');
        let id = parts.next().unwrap_or_default();
        let id = id.trim().parse::<i64>().map_err(|_| invalid())?;
        let code = parts.next().ok_or_else(invalid)?.trim();
        if code.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            id,
            code: code.to_string(),
        })
    }
}

/// 序號 = `<契約單位代碼>-<次數群組 id>`
pub fn serial_number(order_group: &CodedRef, key_unit: &CodedRef) -> String {
    format!("{}-{}", key_unit.code, order_group.id)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractorFields {
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
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressFields {
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

impl AddressFields {
    pub fn is_present(&self) -> bool {
        !self.id_zipcode.trim().is_empty() || !self.dm_zipcode.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub cell_phone: String,
    #[serde(default)]
    pub home_phone: String,
    #[serde(default)]
    pub other_phone: String,
    #[serde(default)]
    pub email: String,
}

impl ContactFields {
    pub fn is_present(&self) -> bool {
        !self.cell_phone.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentFields {
    #[serde(default)]
    pub deal_date: Option<String>,
    #[serde(default)]
    pub income: Option<i64>,
    #[serde(default)]
    pub bank_account: Option<i64>,
    #[serde(default)]
    pub trader: String,
    #[serde(default)]
    pub installment_order: Option<i64>,
}

impl PaymentFields {
    pub fn is_present(&self) -> bool {
        non_empty(&self.deal_date).is_some()
    }
}

/// 契約登錄表單（平面欄位）。修改時另帶既有的 pk 與連結
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingForm {
    pub project: i64,
    pub order_group: String,
    #[serde(default)]
    pub unit_type: Option<i64>,
    pub key_unit: String,
    #[serde(default)]
    pub houseunit: Option<i64>,

    #[serde(flatten)]
    pub contractor: ContractorFields,
    #[serde(flatten)]
    pub address: AddressFields,
    #[serde(flatten)]
    pub contact: ContactFields,
    #[serde(flatten)]
    pub payment: PaymentFields,

    #[serde(default)]
    pub pk: Option<i64>,
    #[serde(default)]
    pub cont_keyunit: Option<i64>,
    #[serde(default)]
    pub cont_houseunit: Option<i64>,
    #[serde(default, rename = "contractorPk")]
    pub contractor_pk: Option<i64>,
    #[serde(default, rename = "addressPk")]
    pub address_pk: Option<i64>,
    #[serde(default, rename = "contactPk")]
    pub contact_pk: Option<i64>,
    #[serde(default, rename = "paymentPk")]
    pub payment_pk: Option<i64>,
}

/// 表單解析後、寫入前的驗證結果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBooking {
    pub order_group: CodedRef,
    pub key_unit: CodedRef,
    pub serial_number: String,
    /// 入金帳目代碼（次數群組代碼）
    pub account_code: Option<i64>,
}

impl BookingForm {
    pub fn resolve(&self) -> Result<ResolvedBooking> {
        let order_group = CodedRef::parse("order_group", &self.order_group)?;
        let key_unit = CodedRef::parse("key_unit", &self.key_unit)?;
        let account_code = order_group.code.parse::<i64>().ok();
        if self.payment.is_present() && account_code.is_none() {
            return Err(ClientError::InvalidReference {
                field: "order_group".to_string(),
                value: self.order_group.clone(),
            });
        }
        validate_non_empty_string("name", &self.contractor.name)?;
        let serial_number = serial_number(&order_group, &key_unit);
        Ok(ResolvedBooking {
            order_group,
            key_unit,
            serial_number,
            account_code,
        })
    }

    fn contract_payload(&self, resolved: &ResolvedBooking) -> Contract {
        Contract {
            pk: None,
            project: Some(self.project),
            order_group: Some(resolved.order_group.id),
            unit_type: self.unit_type,
            serial_number: resolved.serial_number.clone(),
            activation: true,
            keyunit: None,
        }
    }

    fn contractor_payload(&self, contract_id: i64) -> Contractor {
        let fields = &self.contractor;
        Contractor {
            pk: None,
            contract: Some(Ref::Id(contract_id)),
            name: fields.name.clone(),
            birth_date: fields.birth_date.clone(),
            gender: fields.gender.clone(),
            is_registed: fields.is_registed,
            status: fields.status,
            reservation_date: fields.reservation_date.clone(),
            contract_date: fields.contract_date.clone(),
            note: fields.note.clone(),
            succession: None,
            contractorrelease: None,
        }
    }

    fn address_payload(&self, contractor_id: i64) -> ContractorAddress {
        let a = &self.address;
        ContractorAddress {
            pk: None,
            contractor: Some(contractor_id),
            id_zipcode: a.id_zipcode.clone(),
            id_address1: a.id_address1.clone(),
            id_address2: a.id_address2.clone(),
            id_address3: a.id_address3.clone(),
            dm_zipcode: a.dm_zipcode.clone(),
            dm_address1: a.dm_address1.clone(),
            dm_address2: a.dm_address2.clone(),
            dm_address3: a.dm_address3.clone(),
        }
    }

    fn contact_payload(&self, contractor_id: i64) -> ContractorContact {
        let c = &self.contact;
        ContractorContact {
            pk: None,
            contractor: Some(contractor_id),
            cell_phone: c.cell_phone.clone(),
            home_phone: c.home_phone.clone(),
            other_phone: c.other_phone.clone(),
            email: c.email.clone(),
        }
    }

    /// 契約金入金紀錄
    fn cash_book_payload(&self, resolved: &ResolvedBooking, contract_id: i64) -> ProjectCashBook {
        let p = &self.payment;
        ProjectCashBook {
            project: Some(self.project),
            sort: Some(1),
            project_account_d1: resolved.account_code,
            project_account_d2: resolved.account_code,
            is_contract_payment: true,
            contract: Some(contract_id),
            content: format!(
                "{}[{} 대금납부]",
                self.contractor.name, resolved.serial_number
            ),
            trader: p.trader.clone(),
            bank_account: p.bank_account,
            income: p.income,
            installment_order: p.installment_order,
            deal_date: p.deal_date.clone(),
            ..ProjectCashBook::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub contract: Contract,
    pub contractor: Contractor,
    pub steps: Vec<StepRecord>,
    /// 修改完成後應前往的畫面
    pub redirect: Option<RouteLocation>,
}

fn detach(path: String, field: &str) -> Compensation {
    Compensation::Patch {
        path,
        body: json!({ field: null }),
    }
}

/// 契約登錄/修改
pub struct BookingWorkflow<'a> {
    contracts: &'a mut ContractStore,
    cash: &'a ProCashStore,
    notifier: &'a dyn Notifier,
}

impl<'a> BookingWorkflow<'a> {
    pub fn new(
        contracts: &'a mut ContractStore,
        cash: &'a ProCashStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            contracts,
            cash,
            notifier,
        }
    }

    /// 新契約登錄；任一步失敗即回滾先前步驟
    pub async fn create_contract_set(&mut self, form: &BookingForm) -> Result<BookingOutcome> {
        match self.run_create(form).await {
            Ok(outcome) => {
                self.refresh_after_create(form).await;
                self.notifier.success();
                Ok(outcome)
            }
            Err(e) => {
                self.notifier.error(&e);
                Err(e)
            }
        }
    }

    async fn run_create(&self, form: &BookingForm) -> Result<BookingOutcome> {
        let resolved = form.resolve()?;
        let contracts = &*self.contracts;
        let mut saga = Saga::new("create_contract_set", contracts.api());
        tracing::info!("📝 booking {} (project {})", resolved.serial_number, form.project);

        let contract = saga
            .run(
                "create_contract",
                contracts.create_contract(&form.contract_payload(&resolved)),
            )
            .await?;
        let contract_id = contract.pk.ok_or_else(|| ClientError::Validation {
            message: "created contract has no pk".to_string(),
        })?;
        saga.on_rollback(
            "create_contract",
            Compensation::Delete {
                path: format!("/contract/{}/", contract_id),
            },
        );

        let key_unit_id = resolved.key_unit.id;
        saga.run(
            "link_key_unit",
            contracts.patch_key_unit(key_unit_id, Some(contract_id)),
        )
        .await?;
        saga.on_rollback(
            "link_key_unit",
            detach(format!("/key-unit/{}/", key_unit_id), "contract"),
        );

        match form.houseunit {
            Some(house_unit_id) => {
                saga.run(
                    "link_house_unit",
                    contracts.patch_house_unit(house_unit_id, Some(key_unit_id)),
                )
                .await?;
                saga.on_rollback(
                    "link_house_unit",
                    detach(format!("/house-unit/{}/", house_unit_id), "key_unit"),
                );
            }
            None => saga.skip("link_house_unit", "no house unit selected"),
        }

        let contractor = saga
            .run(
                "create_contractor",
                contracts.create_contractor(&form.contractor_payload(contract_id)),
            )
            .await?;
        let contractor_id = contractor.pk.ok_or_else(|| ClientError::Validation {
            message: "created contractor has no pk".to_string(),
        })?;
        saga.on_rollback(
            "create_contractor",
            Compensation::Delete {
                path: format!("/contractor/{}/", contractor_id),
            },
        );

        if form.address.is_present() {
            let address = saga
                .run(
                    "create_address",
                    contracts.create_address(&form.address_payload(contractor_id)),
                )
                .await?;
            if let Some(pk) = address.pk {
                saga.on_rollback(
                    "create_address",
                    Compensation::Delete {
                        path: format!("/contractor-address/{}/", pk),
                    },
                );
            }
        } else {
            saga.skip("create_address", "no zipcode");
        }

        if form.contact.is_present() {
            let contact = saga
                .run(
                    "create_contact",
                    contracts.create_contact(&form.contact_payload(contractor_id)),
                )
                .await?;
            if let Some(pk) = contact.pk {
                saga.on_rollback(
                    "create_contact",
                    Compensation::Delete {
                        path: format!("/contractor-contact/{}/", pk),
                    },
                );
            }
        } else {
            saga.skip("create_contact", "no cell phone");
        }

        if form.payment.is_present() {
            saga.run(
                "create_payment",
                self.cash
                    .post_cash_book(&form.cash_book_payload(&resolved, contract_id)),
            )
            .await?;
        } else {
            saga.skip("create_payment", "no deal date");
        }

        tracing::info!("✅ contract {} booked ({})", contract_id, resolved.serial_number);
        Ok(BookingOutcome {
            contract,
            contractor,
            steps: saga.into_steps(),
            redirect: None,
        })
    }

    async fn refresh_after_create(&mut self, form: &BookingForm) {
        let filter = ContFilter {
            status: Some(form.contractor.status.to_string()),
            ..ContFilter::for_project(form.project)
        };
        if let Err(e) = self.contracts.fetch_contract_list(&filter).await {
            tracing::warn!("⚠️ contract list refresh failed: {}", e);
        }
        if let Err(e) = self.contracts.fetch_project_house_units(form.project).await {
            tracing::warn!("⚠️ house unit refresh failed: {}", e);
        }
    }

    /// 既有契約修改；單位變更時先解除舊連結再建立新連結
    pub async fn update_contract_set(&mut self, form: &BookingForm) -> Result<BookingOutcome> {
        match self.run_update(form).await {
            Ok(mut outcome) => {
                let contract_id = outcome.contract.pk.or(form.pk).unwrap_or_default();
                self.refresh_after_update(form, contract_id).await;
                self.notifier.success();
                outcome.redirect = Some(
                    RouteLocation::named(CONTRACT_REGISTER_ROUTE)
                        .with_query("contract", contract_id),
                );
                Ok(outcome)
            }
            Err(e) => {
                self.notifier.error(&e);
                Err(e)
            }
        }
    }

    async fn run_update(&self, form: &BookingForm) -> Result<BookingOutcome> {
        let pk = *validate_required_field("pk", &form.pk)?;
        let contractor_pk = *validate_required_field("contractorPk", &form.contractor_pk)?;
        let resolved = form.resolve()?;
        let contracts = &*self.contracts;
        let mut saga = Saga::new("update_contract_set", contracts.api());
        tracing::info!("📝 updating contract {} ({})", pk, resolved.serial_number);

        let contract = saga
            .run(
                "update_contract",
                contracts.update_contract(pk, &form.contract_payload(&resolved)),
            )
            .await?;
        let contract_id = contract.pk.unwrap_or(pk);

        let key_unit_id = resolved.key_unit.id;
        let key_changed = Some(key_unit_id) != form.cont_keyunit;
        if key_changed {
            if let Some(prev_house) = form.cont_houseunit {
                saga.run(
                    "unlink_previous_house_unit",
                    contracts.patch_house_unit(prev_house, None),
                )
                .await?;
                saga.on_rollback(
                    "unlink_previous_house_unit",
                    Compensation::Patch {
                        path: format!("/house-unit/{}/", prev_house),
                        body: json!({ "key_unit": form.cont_keyunit }),
                    },
                );
            }
            if let Some(prev_key) = form.cont_keyunit {
                saga.run(
                    "unlink_previous_key_unit",
                    contracts.patch_key_unit(prev_key, None),
                )
                .await?;
                saga.on_rollback(
                    "unlink_previous_key_unit",
                    Compensation::Patch {
                        path: format!("/key-unit/{}/", prev_key),
                        body: json!({ "contract": contract_id }),
                    },
                );
            }
            saga.run(
                "link_key_unit",
                contracts.patch_key_unit(key_unit_id, Some(contract_id)),
            )
            .await?;
            saga.on_rollback(
                "link_key_unit",
                detach(format!("/key-unit/{}/", key_unit_id), "contract"),
            );
        }

        if key_changed || form.houseunit != form.cont_houseunit {
            if let Some(house_unit_id) = form.houseunit {
                saga.run(
                    "link_house_unit",
                    contracts.patch_house_unit(house_unit_id, Some(key_unit_id)),
                )
                .await?;
                let previous_owner = if Some(house_unit_id) == form.cont_houseunit {
                    form.cont_keyunit
                } else {
                    None
                };
                saga.on_rollback(
                    "link_house_unit",
                    Compensation::Patch {
                        path: format!("/house-unit/{}/", house_unit_id),
                        body: json!({ "key_unit": previous_owner }),
                    },
                );
            }
        }

        let mut contractor_payload = form.contractor_payload(contract_id);
        contractor_payload.pk = Some(contractor_pk);
        let contractor = saga
            .run(
                "update_contractor",
                contracts.update_contractor(contractor_pk, &contractor_payload),
            )
            .await?;
        let contractor_id = contractor.pk.unwrap_or(contractor_pk);

        // 無郵遞區號時保留原有地址
        match form.address_pk {
            _ if !form.address.is_present() => saga.skip("update_address", "no zipcode"),
            Some(address_pk) => {
                let mut address = form.address_payload(contractor_id);
                address.pk = Some(address_pk);
                saga.run("update_address", contracts.update_address(address_pk, &address))
                    .await?;
            }
            None => {
                let address = saga
                    .run(
                        "create_address",
                        contracts.create_address(&form.address_payload(contractor_id)),
                    )
                    .await?;
                if let Some(pk) = address.pk {
                    saga.on_rollback(
                        "create_address",
                        Compensation::Delete {
                            path: format!("/contractor-address/{}/", pk),
                        },
                    );
                }
            }
        }

        match form.contact_pk {
            _ if !form.contact.is_present() => saga.skip("update_contact", "no cell phone"),
            Some(contact_pk) => {
                let mut contact = form.contact_payload(contractor_id);
                contact.pk = Some(contact_pk);
                saga.run("update_contact", contracts.update_contact(contact_pk, &contact))
                    .await?;
            }
            None => {
                let contact = saga
                    .run(
                        "create_contact",
                        contracts.create_contact(&form.contact_payload(contractor_id)),
                    )
                    .await?;
                if let Some(pk) = contact.pk {
                    saga.on_rollback(
                        "create_contact",
                        Compensation::Delete {
                            path: format!("/contractor-contact/{}/", pk),
                        },
                    );
                }
            }
        }

        if form.payment.is_present() {
            let mut entry = form.cash_book_payload(&resolved, contract_id);
            match form.payment_pk {
                Some(payment_pk) => {
                    entry.pk = Some(payment_pk);
                    saga.run("update_payment", self.cash.put_cash_book(payment_pk, &entry))
                        .await?;
                }
                None => {
                    saga.run("create_payment", self.cash.post_cash_book(&entry))
                        .await?;
                }
            }
        } else {
            saga.skip("payment", "no deal date");
        }

        tracing::info!("✅ contract {} updated", contract_id);
        Ok(BookingOutcome {
            contract,
            contractor,
            steps: saga.into_steps(),
            redirect: None,
        })
    }

    async fn refresh_after_update(&mut self, form: &BookingForm, contract_id: i64) {
        if let Err(e) = self.contracts.fetch_contract(contract_id).await {
            tracing::warn!("⚠️ contract refresh failed: {}", e);
        }
        if let Err(e) = self
            .contracts
            .fetch_house_unit_list(form.project, form.unit_type, Some(contract_id))
            .await
        {
            tracing::warn!("⚠️ available house unit refresh failed: {}", e);
        }
        if let Err(e) = self.contracts.fetch_project_house_units(form.project).await {
            tracing::warn!("⚠️ house unit refresh failed: {}", e);
        }
    }
}
