use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create accounts table
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(pk_auto(Accounts::Id))
                    .col(string(Accounts::Email).unique_key())
                    .col(string(Accounts::Password))
                    .col(string_null(Accounts::FirstName))
                    .col(string_null(Accounts::LastName))
                    .col(string_null(Accounts::Gender))
                    .col(date_null(Accounts::Birthdate))
                    .col(string_null(Accounts::PhoneNumber))
                    .col(string_null(Accounts::MobileNumber))
                    .col(string(Accounts::Type).string_len(20).default("particular"))
                    .col(boolean(Accounts::IsActive).default(true))
                    .col(boolean(Accounts::IsStaff).default(false))
                    .col(boolean(Accounts::IsSuperuser).default(false))
                    .col(string_null(Accounts::BusinessName))
                    .col(string_null(Accounts::ContactPersonName))
                    .col(string_null(Accounts::ContactPersonPhoneNumber))
                    .col(boolean(Accounts::IsEligibleToWorkWith).default(true))
                    .col(string_null(Accounts::Department))
                    .col(string_null(Accounts::Classification))
                    .col(string_null(Accounts::Branch))
                    .col(boolean(Accounts::InformWhenNewProducts).default(false))
                    .col(string_null(Accounts::InformVia))
                    .col(string_null(Accounts::InvoiceLanguage))
                    .col(string_null(Accounts::Iban))
                    .col(string_null(Accounts::Bic))
                    .col(string_null(Accounts::AccountHolderName))
                    .col(string_null(Accounts::AccountHolderCity))
                    .col(string_null(Accounts::Vat))
                    .col(string_null(Accounts::Kvk))
                    .col(string_null(Accounts::PaymentMethod))
                    .col(decimal_null(Accounts::CustomerPercentage).decimal_len(5, 2))
                    .col(decimal_null(Accounts::InvoiceDiscount).decimal_len(5, 2))
                    .col(string_null(Accounts::PaymentTermin))
                    .col(boolean(Accounts::IsPaymentTerminActive).default(false))
                    .col(decimal_null(Accounts::CreditLimit).decimal_len(10, 2))
                    .col(boolean(Accounts::Incasseren).default(false))
                    .col(string_null(Accounts::InvoiceAddress))
                    .col(string_null(Accounts::DiscountGroup))
                    .col(string_null(Accounts::CustomerColor))
                    .col(string_null(Accounts::RelationType))
                    .col(string_null(Accounts::RelationVia))
                    .col(boolean(Accounts::Notify).default(false))
                    .col(string_null(Accounts::DaysClosed))
                    .col(string_null(Accounts::DaysNoDelivery))
                    .col(string_null(Accounts::Phone))
                    .col(string_null(Accounts::MobilePhone))
                    .col(string_null(Accounts::Fax))
                    .col(string_null(Accounts::ContactPersonEmail))
                    .col(string_null(Accounts::Website))
                    .col(boolean(Accounts::IsSubscribedNewsletters).default(false))
                    .col(boolean(Accounts::IsAccessGrantedSocialMedia).default(false))
                    .col(string_null(Accounts::Facebook))
                    .col(string_null(Accounts::Linkedin))
                    .col(string_null(Accounts::Twitter))
                    .col(string_null(Accounts::Instagram))
                    .col(string_null(Accounts::Pinterest))
                    .col(string_null(Accounts::Tiktok))
                    .col(text_null(Accounts::Notes))
                    .col(timestamp_with_time_zone_null(Accounts::LastLogin))
                    .col(timestamp_with_time_zone_null(Accounts::LastTransactionDate))
                    .col(timestamp_with_time_zone(Accounts::DateJoined))
                    .to_owned(),
            )
            .await?;

        // Create account_action_logs table
        manager
            .create_table(
                Table::create()
                    .table(AccountActionLogs::Table)
                    .if_not_exists()
                    .col(pk_auto(AccountActionLogs::Id))
                    .col(integer(AccountActionLogs::AccountId))
                    .col(string(AccountActionLogs::Action))
                    .col(timestamp_with_time_zone(AccountActionLogs::Timestamp))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_action_log_account")
                            .from(AccountActionLogs::Table, AccountActionLogs::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_accounts_type")
                    .table(Accounts::Table)
                    .col(Accounts::Type)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccountActionLogs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Email,
    Password,
    FirstName,
    LastName,
    Gender,
    Birthdate,
    PhoneNumber,
    MobileNumber,
    Type,
    IsActive,
    IsStaff,
    IsSuperuser,
    BusinessName,
    ContactPersonName,
    ContactPersonPhoneNumber,
    IsEligibleToWorkWith,
    Department,
    Classification,
    Branch,
    InformWhenNewProducts,
    InformVia,
    InvoiceLanguage,
    Iban,
    Bic,
    AccountHolderName,
    AccountHolderCity,
    Vat,
    Kvk,
    PaymentMethod,
    CustomerPercentage,
    InvoiceDiscount,
    PaymentTermin,
    IsPaymentTerminActive,
    CreditLimit,
    Incasseren,
    InvoiceAddress,
    DiscountGroup,
    CustomerColor,
    RelationType,
    RelationVia,
    Notify,
    DaysClosed,
    DaysNoDelivery,
    Phone,
    MobilePhone,
    Fax,
    ContactPersonEmail,
    Website,
    IsSubscribedNewsletters,
    IsAccessGrantedSocialMedia,
    Facebook,
    Linkedin,
    Twitter,
    Instagram,
    Pinterest,
    Tiktok,
    Notes,
    LastLogin,
    LastTransactionDate,
    DateJoined,
}

#[derive(DeriveIden)]
enum AccountActionLogs {
    Table,
    Id,
    AccountId,
    Action,
    Timestamp,
}
