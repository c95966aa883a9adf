/*
 * SPDX-FileCopyrightText: 2025 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Withdrawal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Withdrawal::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Withdrawal::User).uuid().not_null())
                    .col(ColumnDef::new(Withdrawal::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Withdrawal::Method).integer().not_null())
                    .col(ColumnDef::new(Withdrawal::Destination).string().not_null())
                    .col(
                        ColumnDef::new(Withdrawal::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-withdrawal-user")
                            .from(Withdrawal::Table, Withdrawal::User)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Withdrawal::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Withdrawal {
    Table,
    Id,
    User,
    Amount,
    Method,
    Destination,
    CreatedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
