use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpInfoError {
    DatabaseNotFound(String),
    DatabaseLoad(String),
    AddressNotFound(String),
    InvalidClientAddress(String),
    Config(String),
    FileOperation(String),
}

impl IpInfoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpInfoError::DatabaseNotFound(_) => "E001",
            IpInfoError::DatabaseLoad(_) => "E002",
            IpInfoError::AddressNotFound(_) => "E003",
            IpInfoError::InvalidClientAddress(_) => "E004",
            IpInfoError::Config(_) => "E005",
            IpInfoError::FileOperation(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpInfoError::DatabaseNotFound(_) => "GeoIP Database Not Found",
            IpInfoError::DatabaseLoad(_) => "GeoIP Database Load Error",
            IpInfoError::AddressNotFound(_) => "Address Not Found",
            IpInfoError::InvalidClientAddress(_) => "Invalid Client Address",
            IpInfoError::Config(_) => "Configuration Error",
            IpInfoError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpInfoError::DatabaseNotFound(msg) => msg,
            IpInfoError::DatabaseLoad(msg) => msg,
            IpInfoError::AddressNotFound(msg) => msg,
            IpInfoError::InvalidClientAddress(msg) => msg,
            IpInfoError::Config(msg) => msg,
            IpInfoError::FileOperation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端诊断）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for IpInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for IpInfoError {}

// 便捷的构造函数
impl IpInfoError {
    pub fn database_not_found<T: Into<String>>(msg: T) -> Self {
        IpInfoError::DatabaseNotFound(msg.into())
    }

    pub fn database_load<T: Into<String>>(msg: T) -> Self {
        IpInfoError::DatabaseLoad(msg.into())
    }

    pub fn address_not_found<T: Into<String>>(msg: T) -> Self {
        IpInfoError::AddressNotFound(msg.into())
    }

    pub fn invalid_client_address<T: Into<String>>(msg: T) -> Self {
        IpInfoError::InvalidClientAddress(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        IpInfoError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        IpInfoError::FileOperation(msg.into())
    }
}

// 数据库打开阶段的 maxminddb 错误都视为加载失败；查询阶段的错误由 provider 单独映射
impl From<maxminddb::MaxMindDbError> for IpInfoError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        IpInfoError::DatabaseLoad(err.to_string())
    }
}

impl From<std::io::Error> for IpInfoError {
    fn from(err: std::io::Error) -> Self {
        IpInfoError::FileOperation(err.to_string())
    }
}

impl From<config::ConfigError> for IpInfoError {
    fn from(err: config::ConfigError) -> Self {
        IpInfoError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpInfoError>;
