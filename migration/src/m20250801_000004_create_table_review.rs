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
                    .table(Review::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Review::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Review::Task).uuid().not_null())
                    .col(ColumnDef::new(Review::Reviewer).uuid().not_null())
                    .col(ColumnDef::new(Review::Reviewee).uuid().not_null())
                    .col(ColumnDef::new(Review::Rating).small_integer().not_null())
                    .col(ColumnDef::new(Review::Comment).text().not_null())
                    .col(ColumnDef::new(Review::CreatedAt).date_time().not_null())
                    .check(
                        Expr::col(Review::Rating)
                            .gte(1)
                            .and(Expr::col(Review::Rating).lte(5)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-review-task")
                            .from(Review::Table, Review::Task)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-review-reviewer")
                            .from(Review::Table, Review::Reviewer)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-review-reviewee")
                            .from(Review::Table, Review::Reviewee)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-review-task-reviewer")
                    .table(Review::Table)
                    .col(Review::Task)
                    .col(Review::Reviewer)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Review {
    Table,
    Id,
    Task,
    Reviewer,
    Reviewee,
    Rating,
    Comment,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Task {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
