use hostbridge_core::{
    bean, encode, wire_enum, ApiGroup, Call, CallMode, Callback, CallbackShape, Capability,
    MethodDescriptor, Param, Result, Returns,
};

bean! {
    pub struct Database as "Database" {
        name: String => "name",
        compress: bool => "compress",
    }
}

bean! {
    pub struct DatabaseColumn as "DatabaseColumn" {
        name: String => "name",
    }
}

bean! {
    /// Values of one row, in column order.
    pub struct DatabaseRow as "DatabaseRow" {
        values: Vec<String> => "values",
    }
}

bean! {
    /// Table definition, and the result set of a statement.
    pub struct DatabaseTable as "DatabaseTable" {
        name: String => "name",
        column_count: i32 => "columnCount",
        columns: Vec<DatabaseColumn> => "databaseColumns",
        row_count: i32 => "rowCount",
        rows: Vec<DatabaseRow> => "databaseRows",
    }
}

wire_enum! {
    pub enum DatabaseResultWarning as "IDatabaseResultCallbackWarning" {
        DatabaseExists => "DatabaseExists",
        IsOpen => "IsOpen",
    }
}

wire_enum! {
    pub enum DatabaseResultError as "IDatabaseResultCallbackError" {
        NoSpace => "NoSpace",
        SqlException => "SqlException",
        NotDeleted => "NotDeleted",
    }
}

wire_enum! {
    pub enum DatabaseTableResultWarning as "IDatabaseTableResultCallbackWarning" {
        TableExists => "TableExists",
        TableLocked => "TableLocked",
        NoResults => "NoResults",
    }
}

wire_enum! {
    pub enum DatabaseTableResultError as "IDatabaseTableResultCallbackError" {
        NoSpace => "NoSpace",
        ReadOnlyTable => "ReadOnlyTable",
        SqlException => "SqlException",
        DatabaseNotFound => "DatabaseNotFound",
        NoTableFound => "NoTableFound",
    }
}

#[derive(Debug)]
pub struct DatabaseResultCallback;

impl CallbackShape for DatabaseResultCallback {
    const NAME: &'static str = "DatabaseResultCallback";
    type Payload = Database;
    type Warning = DatabaseResultWarning;
    type Error = DatabaseResultError;
}

#[derive(Debug)]
pub struct DatabaseTableResultCallback;

impl CallbackShape for DatabaseTableResultCallback {
    const NAME: &'static str = "DatabaseTableResultCallback";
    type Payload = DatabaseTable;
    type Warning = DatabaseTableResultWarning;
    type Error = DatabaseTableResultError;
}

pub trait DatabaseDelegate: Send + Sync {
    fn create_database(&self, database: Database, callback: Callback<DatabaseResultCallback>);
    fn create_table(
        &self,
        database: Database,
        table: DatabaseTable,
        callback: Callback<DatabaseTableResultCallback>,
    );
    fn delete_database(&self, database: Database, callback: Callback<DatabaseResultCallback>);
    fn delete_table(
        &self,
        database: Database,
        table: DatabaseTable,
        callback: Callback<DatabaseTableResultCallback>,
    );
    /// Run one statement; `?` placeholders are bound to `replacements` in order.
    fn execute_sql_statement(
        &self,
        database: Database,
        statement: String,
        replacements: Vec<String>,
        callback: Callback<DatabaseTableResultCallback>,
    );
    fn execute_sql_transactions(
        &self,
        database: Database,
        statements: Vec<String>,
        rollback_flag: bool,
        callback: Callback<DatabaseTableResultCallback>,
    );
    fn exists_database(&self, database: Database) -> Option<bool>;
    fn exists_table(&self, database: Database, table: DatabaseTable) -> Option<bool>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseOp {
    CreateDatabase,
    CreateTable,
    DeleteDatabase,
    DeleteTable,
    ExecuteSqlStatement,
    ExecuteSqlTransactions,
    ExistsDatabase,
    ExistsTable,
}

const DATABASE: Param = Param::new("database", "Database");
const TABLE: Param = Param::new("databaseTable", "DatabaseTable");

#[derive(Debug)]
pub struct DatabaseBridge;

impl Capability for DatabaseBridge {
    type Delegate = dyn DatabaseDelegate;
    type Op = DatabaseOp;

    const BRIDGE: &'static str = "DatabaseBridge";
    const INTERFACE: &'static str = "IDatabase";
    const GROUP: ApiGroup = ApiGroup::Data;
    const METHODS: &'static [MethodDescriptor<DatabaseOp>] = &[
        MethodDescriptor {
            name: "createDatabase",
            op: DatabaseOp::CreateDatabase,
            params: &[DATABASE],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "createTable",
            op: DatabaseOp::CreateTable,
            params: &[DATABASE, TABLE],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "deleteDatabase",
            op: DatabaseOp::DeleteDatabase,
            params: &[DATABASE],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "deleteTable",
            op: DatabaseOp::DeleteTable,
            params: &[DATABASE, TABLE],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "executeSqlStatement",
            op: DatabaseOp::ExecuteSqlStatement,
            params: &[
                DATABASE,
                Param::new("statement", "string"),
                Param::new("replacements", "[string]"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "executeSqlTransactions",
            op: DatabaseOp::ExecuteSqlTransactions,
            params: &[
                DATABASE,
                Param::new("statements", "[string]"),
                Param::new("rollbackFlag", "boolean"),
            ],
            mode: CallMode::Callback,
        },
        MethodDescriptor {
            name: "existsDatabase",
            op: DatabaseOp::ExistsDatabase,
            params: &[DATABASE],
            mode: CallMode::Sync(Returns::Bool),
        },
        MethodDescriptor {
            name: "existsTable",
            op: DatabaseOp::ExistsTable,
            params: &[DATABASE, TABLE],
            mode: CallMode::Sync(Returns::Bool),
        },
    ];

    fn dispatch(delegate: &Self::Delegate, call: &Call<'_, DatabaseOp>) -> Result<Option<String>> {
        match call.op() {
            DatabaseOp::CreateDatabase => {
                let database = call.param(0)?;
                delegate.create_database(database, call.callback()?);
            }
            DatabaseOp::CreateTable => {
                let (database, table) = (call.param(0)?, call.param(1)?);
                delegate.create_table(database, table, call.callback()?);
            }
            DatabaseOp::DeleteDatabase => {
                let database = call.param(0)?;
                delegate.delete_database(database, call.callback()?);
            }
            DatabaseOp::DeleteTable => {
                let (database, table) = (call.param(0)?, call.param(1)?);
                delegate.delete_table(database, table, call.callback()?);
            }
            DatabaseOp::ExecuteSqlStatement => {
                let database = call.param(0)?;
                let statement = call.string(1)?;
                let replacements = call.param(2)?;
                delegate.execute_sql_statement(database, statement, replacements, call.callback()?);
            }
            DatabaseOp::ExecuteSqlTransactions => {
                let database = call.param(0)?;
                let statements = call.param(1)?;
                let rollback = call.param(2)?;
                delegate.execute_sql_transactions(database, statements, rollback, call.callback()?);
            }
            DatabaseOp::ExistsDatabase => {
                return Ok(encode(delegate.exists_database(call.param(0)?)));
            }
            DatabaseOp::ExistsTable => {
                return Ok(encode(delegate.exists_table(call.param(0)?, call.param(1)?)));
            }
        }
        Ok(None)
    }
}
