//! 扫描配置文件
//!
//! 用 `config` crate 从 TOML / JSON 加载声明式扫描，并叠加 `SCAN__` 前缀的环境变量。
//!
//! ```toml
//! validate_on_build = true
//!
//! [[scans]]
//! assembly = "demo"
//! assignable_to = ["ITransientService"]
//! strategy = "implemented_interfaces"
//! lifetime = "scoped"
//! ```

use crate::assembly::Assembly;
use crate::collection::ServiceCollection;
use crate::filter::ImplementationTypeFilter;
use crate::scan::{ScanPlan, TypeScan};
use di_abstractions::{RegistrationStrategy, ReplacementBehavior};
use infrastructure_common::{
    ConfigError, ConfigResult, Lifetime, ScanError, TypeDescriptor, TypeRef,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error, info};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "SCAN";

/// 服务契约选择方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    #[default]
    #[serde(rename = "self")]
    AsSelf,
    Contracts,
    ImplementedInterfaces,
    MatchingInterface,
    SelfWithInterfaces,
    Attributes,
}

/// 注册方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationKind {
    #[default]
    Append,
    Skip,
    Replace,
    ReplaceImplementation,
    ReplaceAll,
    Throw,
}

impl From<RegistrationKind> for RegistrationStrategy {
    fn from(kind: RegistrationKind) -> Self {
        match kind {
            RegistrationKind::Append => RegistrationStrategy::Append,
            RegistrationKind::Skip => RegistrationStrategy::Skip,
            RegistrationKind::Replace => {
                RegistrationStrategy::Replace(ReplacementBehavior::ServiceType)
            }
            RegistrationKind::ReplaceImplementation => {
                RegistrationStrategy::Replace(ReplacementBehavior::ImplementationType)
            }
            RegistrationKind::ReplaceAll => RegistrationStrategy::Replace(ReplacementBehavior::All),
            RegistrationKind::Throw => RegistrationStrategy::Throw,
        }
    }
}

/// 单个扫描定义
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanDefinition {
    /// 扫描的程序集（crate 名称）
    pub assembly: String,
    /// 只用于解析类型层次结构的程序集
    pub references: Vec<String>,
    pub include_non_public: bool,
    pub assignable_to: Vec<String>,
    pub with_attributes: Vec<String>,
    pub without_attributes: Vec<String>,
    pub in_namespaces: Vec<String>,
    pub not_in_namespaces: Vec<String>,
    pub strategy: SelectionKind,
    /// `strategy = "contracts"` 时使用的服务类型
    pub contracts: Vec<String>,
    /// `strategy = "matching_interface"` 时要求接口与类位于同一命名空间
    pub matching_same_namespace: bool,
    pub lifetime: Lifetime,
    pub registration: RegistrationKind,
}

impl ScanDefinition {
    fn validate(&self, position: usize) -> ConfigResult<()> {
        if self.assembly.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                format!("scans[{position}].assembly"),
                "程序集名称不能为空",
            ));
        }
        if self.strategy == SelectionKind::Contracts && self.contracts.is_empty() {
            return Err(ConfigError::invalid_value(
                format!("scans[{position}].contracts"),
                "strategy = \"contracts\" 时至少需要一个服务类型",
            ));
        }
        Ok(())
    }

    fn filter(&self, assembly: &Assembly) -> ConfigResult<ImplementationTypeFilter> {
        let mut filter = ImplementationTypeFilter::new();
        if self.include_non_public {
            filter = filter.include_non_public();
        }
        for name in &self.assignable_to {
            filter = filter.assignable_to(assembly.resolve_type_name(name)?);
        }
        for attribute in &self.with_attributes {
            filter = filter.with_attribute(attribute.clone());
        }
        for attribute in &self.without_attributes {
            filter = filter.without_attribute(attribute.clone());
        }
        if !self.in_namespaces.is_empty() {
            filter = filter.in_namespaces(self.in_namespaces.iter().cloned());
        }
        if !self.not_in_namespaces.is_empty() {
            filter = filter.not_in_namespaces(self.not_in_namespaces.iter().cloned());
        }
        Ok(filter)
    }

    fn to_plan<R>(&self, resolve: &R) -> ConfigResult<ScanPlan>
    where
        R: Fn(&str) -> Option<Assembly>,
    {
        let find = |name: &str| {
            resolve(name).ok_or_else(|| ScanError::AssemblyNotFound {
                name: name.to_string(),
            })
        };

        let assembly = find(&self.assembly)?;
        let filter = self.filter(&assembly)?;
        let contracts = self
            .contracts
            .iter()
            .map(|name| assembly.resolve_type_name(name))
            .collect::<Result<Vec<TypeRef>, ScanError>>()?;

        let mut source = TypeScan::from_assembly(assembly);
        for reference in &self.references {
            source = source.with_reference(find(reference)?);
        }
        let services = source
            .add_classes_where(|_| filter)
            .using_registration_strategy(self.registration.into());

        let plan = match self.strategy {
            SelectionKind::AsSelf => services.as_self().with_lifetime(self.lifetime),
            SelectionKind::Contracts => {
                services.as_contracts(contracts).with_lifetime(self.lifetime)
            }
            SelectionKind::ImplementedInterfaces => {
                services.as_implemented_interfaces().with_lifetime(self.lifetime)
            }
            SelectionKind::MatchingInterface if self.matching_same_namespace => services
                .as_matching_interface_where(|class: &TypeDescriptor, interface: &TypeRef| {
                    interface.namespace == class.namespace
                })
                .with_lifetime(self.lifetime),
            SelectionKind::MatchingInterface => {
                services.as_matching_interface().with_lifetime(self.lifetime)
            }
            SelectionKind::SelfWithInterfaces => {
                services.as_self_with_interfaces().with_lifetime(self.lifetime)
            }
            SelectionKind::Attributes => services.using_attributes(),
        };
        Ok(plan.into())
    }
}

/// 扫描配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanProfile {
    /// 应用后立即构建服务提供者做验证
    pub validate_on_build: bool,
    pub scans: Vec<ScanDefinition>,
}

impl ScanProfile {
    /// 从 TOML 文本加载
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Self::from_source(config::File::from_str(text, config::FileFormat::Toml))
    }

    /// 从 JSON 文本加载
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        Self::from_source(config::File::from_str(text, config::FileFormat::Json))
    }

    /// 从文件加载，格式由扩展名决定
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        debug!("加载扫描配置: {}", path.display());
        Self::from_source(config::File::from(path))
    }

    fn from_source<S>(source: S) -> ConfigResult<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| {
                error!("扫描配置构建失败: {}", e);
                ConfigError::load(e)
            })?;

        let profile: ScanProfile = settings.try_deserialize().map_err(|e| {
            error!("扫描配置绑定失败: {}", e);
            ConfigError::load(e)
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// 校验各扫描定义
    pub fn validate(&self) -> ConfigResult<()> {
        self.scans
            .iter()
            .enumerate()
            .try_for_each(|(position, scan)| scan.validate(position))
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).map_err(ConfigError::load)
    }

    /// 转换为扫描计划，`resolve` 按名称提供程序集
    pub fn to_plan<R>(&self, resolve: R) -> ConfigResult<ScanPlan>
    where
        R: Fn(&str) -> Option<Assembly>,
    {
        self.scans
            .iter()
            .try_fold(ScanPlan::default(), |plan, scan| Ok(plan.then(scan.to_plan(&resolve)?)))
    }

    /// 应用到服务集合，返回新增的注册数
    ///
    /// 全部扫描和构建验证成功后才修改集合。
    pub fn apply<R>(&self, services: &mut ServiceCollection, resolve: R) -> ConfigResult<usize>
    where
        R: Fn(&str) -> Option<Assembly>,
    {
        let plan = self.to_plan(resolve)?;
        let mut staged = services.clone();
        let added = staged.scan(plan)?;
        if self.validate_on_build {
            staged.build_service_provider()?;
        }
        *services = staged;
        info!("扫描配置应用完成: {} 个扫描, 新增注册 {} 个", self.scans.len(), added);
        Ok(added)
    }

    /// 从全局类型目录解析程序集并应用
    pub fn apply_registered(&self, services: &mut ServiceCollection) -> ConfigResult<usize> {
        self.apply(services, |name| {
            Some(Assembly::named(name)).filter(|assembly| !assembly.is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::ServiceRegistry;
    use std::io::Write;

    fn demo() -> Assembly {
        Assembly::new("demo")
            .with_type(TypeDescriptor::interface("demo::contracts", "ITransientService"))
            .with_type(TypeDescriptor::interface("demo::services", "IMailer"))
            .with_type(
                TypeDescriptor::class("demo::services", "Mailer")
                    .implements(TypeRef::new("demo::contracts", "ITransientService"))
                    .implements(TypeRef::new("demo::services", "IMailer")),
            )
            .with_type(TypeDescriptor::class("demo::services", "Clock"))
    }

    fn resolve(name: &str) -> Option<Assembly> {
        (name == "demo").then(demo)
    }

    const PROFILE: &str = r#"
validate_on_build = true

[[scans]]
assembly = "demo"
assignable_to = ["ITransientService"]
strategy = "implemented_interfaces"
lifetime = "scoped"

[[scans]]
assembly = "demo"
in_namespaces = ["demo::services"]
strategy = "matching_interface"
matching_same_namespace = true
lifetime = "singleton"
registration = "replace"
"#;

    #[test]
    fn test_toml_profile_is_parsed_with_defaults() {
        let profile = ScanProfile::from_toml_str(PROFILE).unwrap();
        assert!(profile.validate_on_build);
        assert_eq!(profile.scans.len(), 2);
        assert_eq!(profile.scans[0].strategy, SelectionKind::ImplementedInterfaces);
        assert_eq!(profile.scans[0].registration, RegistrationKind::Append);
        assert_eq!(profile.scans[1].lifetime, Lifetime::Singleton);
        assert!(!profile.scans[1].include_non_public);
    }

    #[test]
    fn test_apply_runs_scans_in_order() {
        let profile = ScanProfile::from_toml_str(PROFILE).unwrap();
        let mut services = ServiceCollection::new();
        let added = profile.apply(&mut services, resolve).unwrap();
        assert_eq!(added, 3);

        let mailer = services.descriptors_for(&TypeRef::new("demo::services", "IMailer"));
        assert_eq!(mailer.len(), 1);
        assert_eq!(mailer[0].lifetime, Lifetime::Singleton);
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn test_json_profile_with_contracts() {
        let profile = ScanProfile::from_json_str(
            r#"{ "scans": [ { "assembly": "demo", "strategy": "contracts",
                "contracts": ["ITransientService"], "in_namespaces": ["demo::services"] } ] }"#,
        )
        .unwrap();
        let mut services = ServiceCollection::new();
        let result = profile.apply(&mut services, resolve);
        assert!(matches!(result, Err(ConfigError::Scan { .. })));
        assert!(services.is_empty());
    }

    #[test]
    fn test_invalid_definitions_are_rejected() {
        let missing_assembly = ScanProfile::from_toml_str("[[scans]]\nstrategy = \"self\"\n");
        assert!(matches!(missing_assembly, Err(ConfigError::InvalidValue { .. })));

        let no_contracts = ScanProfile::from_toml_str(
            "[[scans]]\nassembly = \"demo\"\nstrategy = \"contracts\"\n",
        );
        assert!(matches!(no_contracts, Err(ConfigError::InvalidValue { .. })));

        let unknown_strategy = ScanProfile::from_toml_str(
            "[[scans]]\nassembly = \"demo\"\nstrategy = \"everything\"\n",
        );
        assert!(matches!(unknown_strategy, Err(ConfigError::Load { .. })));
    }

    #[test]
    fn test_unknown_assembly_and_type_names() {
        let mut services = ServiceCollection::new();
        let profile = ScanProfile::from_toml_str("[[scans]]\nassembly = \"missing\"\n").unwrap();
        assert!(matches!(
            profile.apply(&mut services, resolve),
            Err(ConfigError::Scan {
                source: ScanError::AssemblyNotFound { .. }
            })
        ));

        let profile = ScanProfile::from_toml_str(
            "[[scans]]\nassembly = \"demo\"\nassignable_to = [\"INope\"]\n",
        )
        .unwrap();
        assert!(matches!(
            profile.apply(&mut services, resolve),
            Err(ConfigError::Scan {
                source: ScanError::TypeNotFound { .. }
            })
        ));
    }

    #[test]
    fn test_generic_arguments_resolve_by_simple_name() {
        let app = Assembly::new("app")
            .with_type(TypeDescriptor::interface("app::q", "IHandler").with_generic_params(["T"]))
            .with_type(TypeDescriptor::class("app::q", "Query"))
            .with_type(TypeDescriptor::class("app::q", "Other"))
            .with_type(
                TypeDescriptor::class("app::q", "Handler").implements(
                    TypeRef::new("app::q", "IHandler").with_arg(TypeRef::new("app::q", "Query")),
                ),
            )
            .with_type(
                TypeDescriptor::class("app::q", "OtherHandler").implements(
                    TypeRef::new("app::q", "IHandler").with_arg(TypeRef::new("app::q", "Other")),
                ),
            );
        let profile = ScanProfile::from_toml_str(
            "[[scans]]\nassembly = \"app\"\nassignable_to = [\"IHandler<Query>\"]\n",
        )
        .unwrap();

        let mut services = ServiceCollection::new();
        let added = profile
            .apply(&mut services, |name| (name == "app").then(|| app.clone()))
            .unwrap();
        assert_eq!(added, 1);
        assert!(services.contains(&TypeRef::new("app::q", "Handler")));
    }

    #[test]
    fn test_load_from_file_and_round_trip_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(PROFILE.as_bytes()).unwrap();

        let profile = ScanProfile::load(file.path()).unwrap();
        let reparsed = ScanProfile::from_toml_str(&profile.to_toml_string().unwrap()).unwrap();
        assert_eq!(reparsed, profile);

        assert!(matches!(
            ScanProfile::load("does/not/exist.toml"),
            Err(ConfigError::FileNotFound { .. })
        ));
    }
}
