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
                    .table(Task::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Task::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Task::Title).string().not_null())
                    .col(ColumnDef::new(Task::Description).text().not_null())
                    .col(ColumnDef::new(Task::Budget).big_integer().not_null())
                    .col(ColumnDef::new(Task::Category).string().not_null())
                    .col(ColumnDef::new(Task::Location).string().not_null())
                    .col(ColumnDef::new(Task::PostedBy).uuid().not_null())
                    .col(ColumnDef::new(Task::AcceptedBy).uuid().null())
                    .col(ColumnDef::new(Task::Status).integer().not_null())
                    .col(ColumnDef::new(Task::PostedAt).date_time().not_null())
                    .col(ColumnDef::new(Task::CompletedAt).date_time().null())
                    .check(Expr::col(Task::Budget).gte(30))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-task-posted_by")
                            .from(Task::Table, Task::PostedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-task-accepted_by")
                            .from(Task::Table, Task::AcceptedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-task-posted_at")
                    .table(Task::Table)
                    .col(Task::PostedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Task::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Task {
    Table,
    Id,
    Title,
    Description,
    Budget,
    Category,
    Location,
    PostedBy,
    AcceptedBy,
    Status,
    PostedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
