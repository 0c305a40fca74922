use crate::domain::model::{non_empty, ContractRelease, NumericCode, ProjectCashBook};
use crate::domain::ports::{NoticeLevel, Notifier};
use crate::stores::{ContractStore, ProCashStore};
use crate::utils::error::{ClientError, Result};
use crate::workflow::saga::{StepRecord, TaskLog};
use serde_json::{json, Map, Value};

/// 解約紀錄狀態達此值即執行解約
pub const RELEASE_TRIGGER_STATUS: NumericCode = NumericCode(4);
/// 契約者狀態 3（請約解約）/4（契約解約）代表已解約
pub const RELEASED_CONTRACTOR_STATUS: NumericCode = NumericCode(3);
/// 解約時契約者狀態前進量（1→3, 2→4）
pub const RELEASE_STATUS_STEP: u32 = 2;
/// 退款帳目 = 原入金帳目 + 63
pub const REFUND_ACCOUNT_OFFSET: i64 = 63;

/// `<serial>-terminated-<date>`，無完成日時不附日期
pub fn terminated_serial(serial_number: &str, completion_date: Option<&str>) -> String {
    match completion_date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(date) => format!("{}-terminated-{}", serial_number, date),
        None => format!("{}-terminated", serial_number),
    }
}

/// 在既有備註後附加退款註記
pub fn refund_note(previous: &str, completion_date: Option<&str>) -> String {
    match completion_date.map(str::trim).filter(|d| !d.is_empty()) {
        None => previous.to_string(),
        Some(date) if previous.is_empty() => format!("{} 환불건", date),
        Some(date) => format!("{}, {} 환불건", previous, date),
    }
}

/// 已入金款項改為退款帳目的 PATCH 內容
pub fn refund_patch(entry: &ProjectCashBook, contractor: i64, completion_date: Option<&str>) -> Value {
    let mut body = Map::new();
    if let Some(d1) = entry.project_account_d1 {
        body.insert(
            "project_account_d2".to_string(),
            json!(d1 + REFUND_ACCOUNT_OFFSET),
        );
    }
    body.insert("refund_contractor".to_string(), json!(contractor));
    body.insert(
        "note".to_string(),
        json!(refund_note(&entry.note, completion_date)),
    );
    Value::Object(body)
}

/// 解約紀錄修改是否需要執行解約
pub fn should_release(previous: &ContractRelease, next: &ContractRelease) -> bool {
    let crossed = previous.status < RELEASE_TRIGGER_STATUS && next.status >= RELEASE_TRIGGER_STATUS;
    let dated = non_empty(&previous.completion_date).is_none()
        && non_empty(&next.completion_date).is_some();
    crossed || dated
}

#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub contractor: i64,
    pub contract: Option<i64>,
    /// 契約者早已解約，未做任何寫入
    pub already_released: bool,
    pub steps: Vec<StepRecord>,
}

impl ReleaseReport {
    pub fn failures(&self) -> Vec<&StepRecord> {
        self.steps.iter().filter(|s| s.is_failure()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }
}

/// 解約紀錄寫入結果與（若觸發）解約結果
#[derive(Debug, Clone)]
pub struct ReleaseRecordOutcome {
    pub release: ContractRelease,
    pub report: Option<ReleaseReport>,
}

/// 契約解約與解約紀錄
pub struct ReleaseWorkflow<'a> {
    contracts: &'a mut ContractStore,
    cash: &'a ProCashStore,
    notifier: &'a dyn Notifier,
}

impl<'a> ReleaseWorkflow<'a> {
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

    /// 契約者讀取失敗即中止；其餘各步驟獨立執行並彙整結果
    pub async fn release_set(
        &mut self,
        contractor_id: i64,
        completion_date: Option<&str>,
    ) -> Result<ReleaseReport> {
        let contractor = match self.contracts.get_contractor(contractor_id).await {
            Ok(c) => c,
            Err(e) => {
                self.notifier.error(&e);
                return Err(e);
            }
        };

        let contract_id = contractor.contract_id();
        let mut tasks = TaskLog::new();

        if contractor.status >= RELEASED_CONTRACTOR_STATUS {
            tracing::info!(
                "⏭️ contractor {} already released (status {})",
                contractor_id,
                contractor.status
            );
            tasks.skip("release", "contractor already released");
            return Ok(ReleaseReport {
                contractor: contractor_id,
                contract: contract_id,
                already_released: true,
                steps: tasks.into_steps(),
            });
        }

        let contract_id = match contract_id {
            Some(id) => id,
            None => {
                let e = ClientError::InvalidReference {
                    field: "contractor.contract".to_string(),
                    value: contractor_id.to_string(),
                };
                self.notifier.error(&e);
                return Err(e);
            }
        };
        tracing::info!("🔓 releasing contractor {} / contract {}", contractor_id, contract_id);

        let contracts = &*self.contracts;
        let next_status = contractor.status.advance(RELEASE_STATUS_STEP).to_string();
        tasks
            .attempt(
                "update_contractor_status",
                contracts.release_contractor(contractor_id, &next_status),
            )
            .await;

        let contract = tasks
            .attempt("fetch_contract", contracts.get_contract(contract_id))
            .await;
        match &contract {
            Some(contract) => {
                let serial = terminated_serial(&contract.serial_number, completion_date);
                tasks
                    .attempt(
                        "terminate_contract",
                        contracts.terminate_contract(contract_id, &serial),
                    )
                    .await;
            }
            None => tasks.skip("terminate_contract", "contract not loaded"),
        }

        let key_unit_id = contractor.key_unit_id().or_else(|| {
            contract
                .as_ref()
                .and_then(|c| c.keyunit.as_ref())
                .and_then(|k| k.id())
        });
        let unlinked = match key_unit_id {
            Some(key_unit_id) => {
                tasks
                    .attempt("unlink_key_unit", contracts.patch_key_unit(key_unit_id, None))
                    .await
            }
            None => {
                tasks.skip("unlink_key_unit", "no key unit linked");
                None
            }
        };

        match unlinked.as_ref().map(|k| k.house_unit_id()) {
            Some(Some(house_unit_id)) => {
                tasks
                    .attempt(
                        "unlink_house_unit",
                        contracts.patch_house_unit(house_unit_id, None),
                    )
                    .await;
            }
            Some(None) => tasks.skip("unlink_house_unit", "no house unit linked"),
            None => tasks.skip("unlink_house_unit", "key unit not unlinked"),
        }

        let payments = tasks
            .attempt("fetch_payments", self.cash.contract_payments(contract_id))
            .await
            .unwrap_or_default();
        for payment in &payments {
            let Some(pk) = payment.pk else { continue };
            let body = refund_patch(payment, contractor_id, completion_date);
            tasks
                .attempt(
                    &format!("refund_payment:{}", pk),
                    self.cash.patch_cash_book_fields(pk, &body),
                )
                .await;
        }

        self.settle(contractor_id, contract_id, tasks).await
    }

    async fn settle(
        &mut self,
        contractor_id: i64,
        contract_id: i64,
        tasks: TaskLog,
    ) -> Result<ReleaseReport> {
        if let Err(e) = self.contracts.fetch_contractor(contractor_id).await {
            tracing::warn!("⚠️ contractor refresh failed: {}", e);
        }
        if let Err(e) = self.contracts.fetch_contract(contract_id).await {
            tracing::warn!("⚠️ contract refresh failed: {}", e);
        }

        let report = ReleaseReport {
            contractor: contractor_id,
            contract: Some(contract_id),
            already_released: false,
            steps: tasks.into_steps(),
        };

        if report.is_complete() {
            tracing::info!("✅ contractor {} released", contractor_id);
            self.notifier.success();
        } else {
            let failed = report
                .failures()
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!("⚠️ release of contractor {} incomplete: {}", contractor_id, failed);
            self.notifier.notify(
                NoticeLevel::Warning,
                "알림!",
                &format!("해지 처리 중 일부 작업이 실패했습니다: {}", failed),
            );
        }
        Ok(report)
    }

    /// 建立解約紀錄；狀態已達解約門檻時接著執行解約
    pub async fn create_release(&mut self, release: &ContractRelease) -> Result<ReleaseRecordOutcome> {
        let created = match self.contracts.create_release_record(release).await {
            Ok(created) => created,
            Err(e) => {
                self.notifier.error(&e);
                return Err(e);
            }
        };
        self.refresh_releases(&created, 1).await;

        let report = if release.status >= RELEASE_TRIGGER_STATUS {
            Some(
                self.release_set(release.contractor, release.completion_date.as_deref())
                    .await?,
            )
        } else {
            self.notifier.success();
            None
        };

        Ok(ReleaseRecordOutcome {
            release: created,
            report,
        })
    }

    /// 修改解約紀錄；只在狀態跨越門檻或新填完成日時執行解約
    pub async fn update_release(
        &mut self,
        pk: i64,
        release: &ContractRelease,
        page: u64,
    ) -> Result<ReleaseRecordOutcome> {
        let result = async {
            let previous = self.contracts.get_cont_release(pk).await?;
            let mut next = release.clone();
            next.pk = Some(pk);
            let updated = self.contracts.update_release_record(pk, &next).await?;
            Ok::<_, ClientError>((previous, updated))
        }
        .await;

        let (previous, updated) = match result {
            Ok(pair) => pair,
            Err(e) => {
                self.notifier.error(&e);
                return Err(e);
            }
        };
        self.refresh_releases(&updated, page).await;

        let report = if should_release(&previous, release) {
            Some(
                self.release_set(release.contractor, release.completion_date.as_deref())
                    .await?,
            )
        } else {
            self.notifier.success();
            None
        };

        Ok(ReleaseRecordOutcome {
            release: updated,
            report,
        })
    }

    async fn refresh_releases(&mut self, release: &ContractRelease, page: u64) {
        if let Some(pk) = release.pk {
            if let Err(e) = self.contracts.fetch_cont_release(pk).await {
                tracing::warn!("⚠️ release refresh failed: {}", e);
            }
        }
        if let Err(e) = self
            .contracts
            .fetch_cont_release_list(release.project, page)
            .await
        {
            tracing::warn!("⚠️ release list refresh failed: {}", e);
        }
    }
}
