use crate::domain::model::{NumericCode, StaffAuth, UserInfo};

pub const LOGIN: &str = "Login";
pub const REGISTER: &str = "Register";
pub const REGISTER_CODE: &str = "RegisterCode";
pub const NOT_FOUND: &str = "NotFound";

/// 權限不足時替換的畫面
pub const NO_AUTH_VIEW: &str = "_Accounts/NoAuth";

/// 未登入也能進入的路由
pub const PUBLIC_ROUTES: [&str; 3] = [LOGIN, REGISTER, REGISTER_CODE];

/// 各功能區塊對應的權限欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Contract,
    Payment,
    Notice,
    ProjectCash,
    ProjectDocs,
    Project,
    CompanyCash,
    CompanyDocs,
    HumanResource,
    CompanySettings,
}

impl Section {
    fn level(self, auth: &StaffAuth) -> NumericCode {
        match self {
            Section::Contract => auth.contract,
            Section::Payment => auth.payment,
            Section::Notice => auth.notice,
            Section::ProjectCash => auth.project_cash,
            Section::ProjectDocs => auth.project_docs,
            Section::Project => auth.project,
            Section::CompanyCash => auth.company_cash,
            Section::CompanyDocs => auth.company_docs,
            Section::HumanResource => auth.human_resource,
            Section::CompanySettings => auth.company_settings,
        }
    }

    /// 超級使用者或權限等級大於 0
    pub fn permits(self, user: Option<&UserInfo>) -> bool {
        match user {
            Some(u) if u.is_superuser => true,
            Some(u) => u
                .staffauth
                .as_ref()
                .is_some_and(|auth| self.level(auth) > NumericCode(0)),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteMeta {
    pub title: Option<String>,
    pub auth: bool,
    pub affix: bool,
    /// 不顯示於頁籤、不需選單對應
    pub except: bool,
}

/// 展開後的路由（完整路徑）
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub path: String,
    pub name: String,
    pub view: Option<String>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub section: Option<Section>,
}

/// 路由定義（巢狀）
#[derive(Debug, Clone)]
pub struct RouteDef {
    path: String,
    name: String,
    view: Option<String>,
    redirect: Option<String>,
    meta: Option<RouteMeta>,
    section: Option<Section>,
    children: Vec<RouteDef>,
}

impl RouteDef {
    fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view: None,
            redirect: None,
            meta: None,
            section: None,
            children: Vec::new(),
        }
    }

    /// 一般頁面，標題同名稱且需登入
    fn page(path: &str, name: &str, view: impl Into<String>) -> Self {
        Self::new(path, name).view(view).titled(name)
    }

    fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    fn redirect(mut self, to: &str) -> Self {
        self.redirect = Some(to.to_string());
        self
    }

    fn titled(mut self, title: &str) -> Self {
        self.meta = Some(RouteMeta {
            title: Some(title.to_string()),
            auth: true,
            ..RouteMeta::default()
        });
        self
    }

    fn affix(mut self) -> Self {
        if let Some(meta) = self.meta.as_mut() {
            meta.affix = true;
        }
        self
    }

    fn except(mut self, title: &str) -> Self {
        self.meta = Some(RouteMeta {
            title: Some(title.to_string()),
            auth: false,
            affix: false,
            except: true,
        });
        self
    }

    fn section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    fn children(mut self, children: Vec<RouteDef>) -> Self {
        self.children = children;
        self
    }

    /// 子路由繼承上層的 meta 與權限區塊
    fn flatten_into(
        &self,
        parent_path: &str,
        parent_meta: Option<&RouteMeta>,
        parent_section: Option<Section>,
        out: &mut Vec<RouteRecord>,
    ) {
        let path = join_path(parent_path, &self.path);
        let meta = self.meta.as_ref().or(parent_meta);
        let section = self.section.or(parent_section);
        out.push(RouteRecord {
            path: path.clone(),
            name: self.name.clone(),
            view: self.view.clone(),
            redirect: self.redirect.clone(),
            meta: meta.cloned().unwrap_or_default(),
            section,
        });
        for child in &self.children {
            child.flatten_into(&path, meta, section, out);
        }
    }
}

fn join_path(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    format!("{}/{}", parent.trim_end_matches('/'), path)
}

/// 文章型頁面的 檢視/修改/作成 子路由
fn post_children(prefix: &str, param: &str) -> Vec<RouteDef> {
    vec![
        RouteDef::new(param, format!("{} - 보기", prefix)),
        RouteDef::new(format!("{}/update", param), format!("{} - 수정", prefix)),
        RouteDef::new("create", format!("{} - 작성", prefix)),
    ]
}

fn docs_section(
    path: &str,
    name: &str,
    redirect: &str,
    section: Section,
    view_root: &str,
    labels: [&str; 3],
) -> RouteDef {
    let [general, lawsuit_docs, lawsuit_case] = labels;
    let view = |leaf: &str| format!("{}/{}", view_root, leaf);
    RouteDef::new(path, name)
        .redirect(redirect)
        .section(section)
        .children(vec![
            RouteDef::page("general/docs", general, view("GeneralDocs"))
                .children(post_children(general, ":postId(\\d+)")),
            RouteDef::page("lawsuit/docs", lawsuit_docs, view("LawsuitDocs"))
                .children(post_children(lawsuit_docs, ":postId(\\d+)")),
            RouteDef::page("lawsuit/case", lawsuit_case, view("LawsuitCase"))
                .children(post_children(lawsuit_case, ":caseId(\\d+)")),
        ])
}

/// 應用程式的完整路由表
pub fn route_table() -> Vec<RouteRecord> {
    let home = RouteDef::new("/", "Home")
        .view("DefaultLayout")
        .redirect("/dashboard")
        .children(vec![
            RouteDef::page("dashboard", "대 시 보 드", "_Dashboard/Index").affix(),
            RouteDef::page("dashboard/notices", "공지 사항", "_Dashboard/NoticeBoard")
                .titled("대 시 보 드")
                .affix()
                .children(post_children("공지 사항", ":postId(\\d+)")),
            RouteDef::page("schedule", "일 정 관 리", "_Schedules/Index").affix(),
            RouteDef::new("contracts", "분양 계약 관리")
                .redirect("/contracts/index")
                .section(Section::Contract)
                .children(vec![
                    RouteDef::page("index", "계약 내역 조회", "Contracts/List"),
                    RouteDef::page("register", "계약등록 관리", "Contracts/Register"),
                    RouteDef::page("release", "계약 해지 관리", "Contracts/Release"),
                    RouteDef::page("succession", "권리 의무 승계", "Contracts/Succession"),
                    RouteDef::page("status", "동호 배치 현황", "Contracts/Status"),
                ]),
            RouteDef::new("payments", "분양 수납 관리")
                .redirect("/payments/index")
                .section(Section::Payment)
                .children(vec![
                    RouteDef::page("index", "수납 내역 조회", "Payments/List"),
                    RouteDef::page("register", "건별 수납 관리", "Payments/Register"),
                    RouteDef::page("status", "수납 현황 집계", "Payments/Status"),
                ]),
            RouteDef::new("notices", "고객 고지 관리")
                .redirect("/notices/bill")
                .section(Section::Notice)
                .children(vec![
                    RouteDef::page("bill", "수납 고지서 출력", "Notices/Bill"),
                    RouteDef::page("sms", "SMS 발송 관리", "Notices/Sms"),
                    RouteDef::page("log", "발송 기록 관리", "Notices/Log"),
                ]),
            RouteDef::new("project-cash", "현장 자금 관리")
                .redirect("/project-cash/status")
                .section(Section::ProjectCash)
                .children(vec![
                    RouteDef::page("status", "현장 자금 현황", "ProCash/Status"),
                    RouteDef::page("index", "현장 출납 내역", "ProCash/CashBook"),
                    RouteDef::page("imprest", "운영비용(전도금)", "ProCash/Imprest"),
                ]),
            docs_section(
                "project-docs",
                "현장 문서 관리",
                "/project-docs/general/docs",
                Section::ProjectDocs,
                "proDocs",
                ["현장 일반 문서", "현장 소송 문서", "현장 소송 사건"],
            ),
            RouteDef::new("project", "신규 프로젝트")
                .redirect("/project/manage/index")
                .section(Section::Project)
                .children(vec![
                    RouteDef::page("manage/index", "프로젝트 관리", "Projects/Manage"),
                    RouteDef::page("settings/unit", "타입 정보 등록", "Projects/UnitType"),
                    RouteDef::page("site/index", "사업 부지 관리", "Projects/Site"),
                ]),
            RouteDef::new("cash", "본사 자금 관리")
                .redirect("/cash/status")
                .section(Section::CompanyCash)
                .children(vec![
                    RouteDef::page("status", "본사 자금 현황", "ComCash/Status"),
                    RouteDef::page("index", "본사 출납 내역", "ComCash/CashBook"),
                ]),
            docs_section(
                "docs",
                "본사 문서 관리",
                "/docs/general/docs",
                Section::CompanyDocs,
                "comDocs",
                ["본사 일반 문서", "본사 소송 문서", "본사 소송 사건"],
            ),
            RouteDef::new("hr-manage", "본사 인사 관리")
                .redirect("/hr-manage/staff")
                .section(Section::HumanResource)
                .children(vec![
                    RouteDef::page("staff", "직원 정보 관리", "hrManage/Staff"),
                    RouteDef::page("department", "부서 정보 관리", "hrManage/Department"),
                    RouteDef::page("position", "직위 정보 관리", "hrManage/Position"),
                    RouteDef::page("duty", "직책 정보 관리", "hrManage/Duty"),
                    RouteDef::page("grade", "직급 정보 관리", "hrManage/Grade"),
                ]),
            RouteDef::new("settings", "환경 설정")
                .redirect("/settings/company")
                .section(Section::CompanySettings)
                .children(vec![
                    RouteDef::page("company", "회사 정보 관리", "Settings/Company"),
                    RouteDef::page("authorization", "권한 설정 관리", "Settings/Authorization"),
                ]),
            RouteDef::page("mypage", "마이페이지", "_MyPage/Index").affix(),
            RouteDef::new("/:pathMatch(.*)*", NOT_FOUND)
                .view("NotFound")
                .except("Not-Found"),
        ]);

    let accounts = [
        RouteDef::new("/accounts/login", LOGIN)
            .view("_Accounts/Login")
            .except("로그인"),
        RouteDef::new("/accounts/register", REGISTER)
            .view("_Accounts/Register")
            .except("회원가입"),
        RouteDef::new("/accounts/register-code", REGISTER_CODE)
            .view("_Accounts/RegisterCode")
            .except("코드입력"),
    ];

    let mut out = Vec::new();
    home.flatten_into("", None, None, &mut out);
    for def in &accounts {
        def.flatten_into("", None, None, &mut out);
    }
    out
}
